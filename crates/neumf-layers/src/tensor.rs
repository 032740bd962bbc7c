//! Tensor type for neural network computations.
//!
//! A small row-major `f32` tensor carrying exactly the operations the NeuMF
//! stack needs. Shape violations are programming errors and panic; layer
//! entry points validate their inputs and return errors instead.

use serde::{Deserialize, Serialize};

/// A multi-dimensional array in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    /// The shape of the tensor (dimensions)
    shape: Vec<usize>,
    /// The underlying data in row-major order
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a tensor of the given shape filled with zeros.
    ///
    /// # Example
    ///
    /// ```
    /// use neumf_layers::tensor::Tensor;
    ///
    /// let t = Tensor::zeros(&[2, 3]);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert_eq!(t.numel(), 6);
    /// ```
    pub fn zeros(shape: &[usize]) -> Self {
        let numel: usize = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            data: vec![0.0; numel],
        }
    }

    /// Creates a tensor with the given shape and data.
    ///
    /// # Panics
    ///
    /// Panics if the data length doesn't match the shape.
    pub fn from_data(shape: &[usize], data: Vec<f32>) -> Self {
        let numel: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            numel,
            "Data length {} doesn't match shape {:?} (expected {})",
            data.len(),
            shape,
            numel
        );
        Self {
            shape: shape.to_vec(),
            data,
        }
    }

    /// Returns the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns a reference to the underlying data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns a mutable reference to the underlying data.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Matrix multiplication between two 2D tensors.
    ///
    /// # Panics
    ///
    /// Panics if either operand is not 2D or the inner dimensions differ.
    pub fn matmul(&self, other: &Tensor) -> Tensor {
        assert_eq!(self.ndim(), 2, "matmul requires 2D tensors");
        assert_eq!(other.ndim(), 2, "matmul requires 2D tensors");
        assert_eq!(
            self.shape[1], other.shape[0],
            "Inner dimensions must match for matmul"
        );

        let m = self.shape[0];
        let k = self.shape[1];
        let n = other.shape[1];

        let mut result = vec![0.0; m * n];
        for i in 0..m {
            for l in 0..k {
                let a = self.data[i * k + l];
                if a == 0.0 {
                    continue;
                }
                let row = &other.data[l * n..(l + 1) * n];
                let out = &mut result[i * n..(i + 1) * n];
                for (o, &b) in out.iter_mut().zip(row) {
                    *o += a * b;
                }
            }
        }

        Tensor::from_data(&[m, n], result)
    }

    /// Transposes a 2D tensor.
    pub fn transpose(&self) -> Tensor {
        assert_eq!(self.ndim(), 2, "transpose requires 2D tensor");
        let m = self.shape[0];
        let n = self.shape[1];

        let mut result = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                result[j * m + i] = self.data[i * n + j];
            }
        }

        Tensor::from_data(&[n, m], result)
    }

    /// Element-wise addition; a 1D right-hand side broadcasts along rows
    /// (bias addition).
    pub fn add(&self, other: &Tensor) -> Tensor {
        if self.shape == other.shape {
            let data: Vec<f32> = self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a + b)
                .collect();
            Tensor::from_data(&self.shape, data)
        } else if self.ndim() == 2 && other.ndim() == 1 && self.shape[1] == other.shape[0] {
            let mut data = self.data.clone();
            let n = self.shape[1];
            for row in data.chunks_mut(n) {
                for (v, &b) in row.iter_mut().zip(other.data.iter()) {
                    *v += b;
                }
            }
            Tensor::from_data(&self.shape, data)
        } else {
            panic!(
                "Cannot broadcast shapes {:?} and {:?}",
                self.shape, other.shape
            );
        }
    }

    /// Element-wise subtraction of same-shape tensors.
    pub fn sub(&self, other: &Tensor) -> Tensor {
        assert_eq!(
            self.shape, other.shape,
            "Cannot subtract shapes {:?} and {:?}",
            self.shape, other.shape
        );
        let data: Vec<f32> = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a - b)
            .collect();
        Tensor::from_data(&self.shape, data)
    }

    /// Element-wise multiplication of same-shape tensors.
    pub fn mul(&self, other: &Tensor) -> Tensor {
        assert_eq!(
            self.shape, other.shape,
            "Cannot multiply shapes {:?} and {:?}",
            self.shape, other.shape
        );
        let data: Vec<f32> = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .collect();
        Tensor::from_data(&self.shape, data)
    }

    /// Scalar multiplication.
    pub fn scale(&self, scalar: f32) -> Tensor {
        let data: Vec<f32> = self.data.iter().map(|a| a * scalar).collect();
        Tensor::from_data(&self.shape, data)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Sums a 2D tensor along axis 0, producing a `[cols]` tensor.
    pub fn sum_axis0(&self) -> Tensor {
        assert_eq!(self.ndim(), 2, "sum_axis0 requires 2D tensor");
        let n = self.shape[1];
        let mut result = vec![0.0; n];
        for row in self.data.chunks(n) {
            for (r, &v) in result.iter_mut().zip(row) {
                *r += v;
            }
        }
        Tensor::from_data(&[n], result)
    }

    /// Applies a function element-wise.
    pub fn map<F>(&self, f: F) -> Tensor
    where
        F: Fn(f32) -> f32,
    {
        let data: Vec<f32> = self.data.iter().map(|&x| f(x)).collect();
        Tensor::from_data(&self.shape, data)
    }

    /// Reshapes the tensor.
    ///
    /// # Panics
    ///
    /// Panics if the new shape has a different number of elements.
    pub fn reshape(&self, new_shape: &[usize]) -> Tensor {
        let new_numel: usize = new_shape.iter().product();
        assert_eq!(
            self.numel(),
            new_numel,
            "Cannot reshape tensor of {} elements to shape {:?}",
            self.numel(),
            new_shape
        );
        Tensor::from_data(new_shape, self.data.clone())
    }

    /// Concatenates two 2D tensors with equal row counts along the column
    /// axis.
    pub fn concat_cols(&self, other: &Tensor) -> Tensor {
        assert_eq!(self.ndim(), 2, "concat_cols requires 2D tensors");
        assert_eq!(other.ndim(), 2, "concat_cols requires 2D tensors");
        assert_eq!(
            self.shape[0], other.shape[0],
            "Row counts must match for concat_cols"
        );

        let rows = self.shape[0];
        let (a, b) = (self.shape[1], other.shape[1]);
        let mut data = Vec::with_capacity(rows * (a + b));
        for i in 0..rows {
            data.extend_from_slice(&self.data[i * a..(i + 1) * a]);
            data.extend_from_slice(&other.data[i * b..(i + 1) * b]);
        }
        Tensor::from_data(&[rows, a + b], data)
    }

    /// Splits a 2D tensor into two at column `at`.
    pub fn split_cols(&self, at: usize) -> (Tensor, Tensor) {
        assert_eq!(self.ndim(), 2, "split_cols requires 2D tensor");
        let cols = self.shape[1];
        assert!(at <= cols, "Split point {} beyond {} columns", at, cols);

        let rows = self.shape[0];
        let mut left = Vec::with_capacity(rows * at);
        let mut right = Vec::with_capacity(rows * (cols - at));
        for row in self.data.chunks(cols) {
            left.extend_from_slice(&row[..at]);
            right.extend_from_slice(&row[at..]);
        }
        (
            Tensor::from_data(&[rows, at], left),
            Tensor::from_data(&[rows, cols - at], right),
        )
    }

    /// Index of the maximum element in each row of a 2D tensor.
    ///
    /// Ties resolve to the lowest index.
    pub fn argmax_rows(&self) -> Vec<usize> {
        assert_eq!(self.ndim(), 2, "argmax_rows requires 2D tensor");
        let n = self.shape[1];
        self.data
            .chunks(n)
            .map(|row| {
                let mut best = 0;
                for (j, &v) in row.iter().enumerate() {
                    if v > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_creation() {
        let t = Tensor::zeros(&[2, 3]);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.numel(), 6);
        assert!(t.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_matmul() {
        let a = Tensor::from_data(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Tensor::from_data(&[3, 2], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let c = a.matmul(&b);
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.data()[0], 22.0); // 1*1 + 2*3 + 3*5
        assert_eq!(c.data()[1], 28.0); // 1*2 + 2*4 + 3*6
    }

    #[test]
    fn test_transpose() {
        let a = Tensor::from_data(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = a.transpose();
        assert_eq!(b.shape(), &[3, 2]);
        assert_eq!(b.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_add_bias_broadcast() {
        let a = Tensor::from_data(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Tensor::from_data(&[3], vec![10.0, 20.0, 30.0]);
        let c = a.add(&b);
        assert_eq!(c.data(), &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    }

    #[test]
    fn test_mul_and_sub() {
        let a = Tensor::from_data(&[2, 2], vec![1.0, 2.0, 3.0, 4.0]);
        let b = Tensor::from_data(&[2, 2], vec![2.0, 2.0, 2.0, 2.0]);
        assert_eq!(a.mul(&b).data(), &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(a.sub(&b).data(), &[-1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_sum_axis0() {
        let a = Tensor::from_data(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let s = a.sum_axis0();
        assert_eq!(s.shape(), &[3]);
        assert_eq!(s.data(), &[5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_concat_split_roundtrip() {
        let a = Tensor::from_data(&[2, 2], vec![1.0, 2.0, 5.0, 6.0]);
        let b = Tensor::from_data(&[2, 3], vec![3.0, 4.0, 0.0, 7.0, 8.0, 9.0]);
        let c = a.concat_cols(&b);
        assert_eq!(c.shape(), &[2, 5]);
        assert_eq!(c.data(), &[1.0, 2.0, 3.0, 4.0, 0.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

        let (l, r) = c.split_cols(2);
        assert_eq!(l, a);
        assert_eq!(r, b);
    }

    #[test]
    fn test_argmax_rows() {
        let t = Tensor::from_data(&[2, 3], vec![0.1, 0.9, 0.5, 0.7, 0.2, 0.7]);
        assert_eq!(t.argmax_rows(), vec![1, 0]);
    }

    #[test]
    fn test_map_and_scale() {
        let a = Tensor::from_data(&[2, 2], vec![1.0, -2.0, 3.0, -4.0]);
        assert_eq!(a.map(f32::abs).data(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.scale(2.0).data(), &[2.0, -4.0, 6.0, -8.0]);
    }
}
