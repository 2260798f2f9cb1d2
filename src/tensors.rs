//! 张量创建示例
//!
//! 用ndarray构建0到3阶的张量，并把它们转换为ONNX Runtime张量。

use log::info;
use ndarray::{Array, ArrayD, IxDyn, arr0, arr1, arr2};
use ort::value::Tensor;

use crate::error::Result;

/// 示例中使用的一组张量
pub fn sample_tensors() -> Vec<(&'static str, ArrayD<f32>)> {
    vec![
        ("scalar", arr0(3.0f32).into_dyn()),
        ("vector", arr1(&[1.0f32, 2.0, 3.0, 4.0]).into_dyn()),
        ("matrix", arr2(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn()),
        (
            "rank3",
            Array::from_shape_fn(IxDyn(&[2, 3, 4]), |idx| (idx[0] * 12 + idx[1] * 4 + idx[2]) as f32),
        ),
    ]
}

/// 描述一个张量的阶数和形状
pub fn describe(name: &str, tensor: &ArrayD<f32>) -> String {
    format!("{name}: rank {} shape {:?}", tensor.ndim(), tensor.shape())
}

/// 将ndarray数组转换为ONNX Runtime张量
pub fn to_input(array: &ArrayD<f32>) -> Result<Tensor<f32>> {
    let shape: Vec<i64> = array.shape().iter().map(|&d| d as i64).collect();
    let data: Vec<f32> = array.iter().copied().collect();
    Ok(Tensor::from_array((shape, data))?)
}

/// 运行张量创建示例
pub fn run() -> Result<()> {
    for (name, array) in sample_tensors() {
        println!("{}", describe(name, &array));
        to_input(&array)?;
        info!("{name} 已转换为ONNX张量，元素个数 {}", array.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_zero_to_three() {
        let ranks: Vec<usize> = sample_tensors().iter().map(|(_, t)| t.ndim()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn rank3_is_row_major() {
        let tensors = sample_tensors();
        let (_, rank3) = &tensors[3];
        assert_eq!(rank3[&[1, 2, 3][..]], 23.0);
        assert_eq!(rank3.iter().copied().sum::<f32>(), (0..24).sum::<i32>() as f32);
    }

    #[test]
    fn describe_reports_shape() {
        let tensors = sample_tensors();
        let (name, matrix) = &tensors[2];
        assert_eq!(describe(name, matrix), "matrix: rank 2 shape [2, 3]");
    }
}
