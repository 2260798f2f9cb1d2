use ndarray::{Array1, Array2, Array4};
use ort::{inputs, session::Session, value::{DynValue, Tensor}};

use crate::config::{
    DETECTION_BOXES, DETECTION_CLASSES, DETECTION_SCORES, INPUT_TENSOR, NUM_DETECTIONS,
};
use crate::error::{ExampleError, Result};

/// 一次推理的原始输出
///
/// 批大小固定为1，批维度已经去掉。
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutputs {
    /// 模型声明的检测数量（模型以浮点数输出）
    pub num_detections: f32,
    /// 形状为(N,)的类别ID
    pub classes: Array1<f32>,
    /// 形状为(N,)的置信度
    pub scores: Array1<f32>,
    /// 形状为(N, 4)的边界框，每行为 `[ymin, xmin, ymax, xmax]`
    pub boxes: Array2<f32>,
}

/// 运行模型推理
///
/// 使用 `serving_default` 签名对输入张量进行推理，取出检测相关的四个输出。
///
/// # 参数
/// * `model` - ONNX模型Session
/// * `input` - 输入张量，形状应为(1, height, width, 3)
///
/// # 错误处理
/// 推理失败返回 `ExampleError::Model`；缺少输出或形状不符合预期返回 `ExampleError::Malformed`
pub fn run_inference(model: &mut Session, input: &Array4<u8>) -> Result<RawOutputs> {
    let shape: Vec<usize> = input.shape().to_vec();
    let data: Vec<u8> = input.iter().copied().collect();
    let input_tensor = Tensor::from_array(([shape[0], shape[1], shape[2], shape[3]], data))?;

    let outputs = model.run(inputs![INPUT_TENSOR => input_tensor])?;

    let (_, num) = extract(outputs.get(NUM_DETECTIONS), NUM_DETECTIONS, 1)?;
    let (_, classes) = extract(outputs.get(DETECTION_CLASSES), DETECTION_CLASSES, 2)?;
    let (_, scores) = extract(outputs.get(DETECTION_SCORES), DETECTION_SCORES, 2)?;
    let (box_shape, boxes) = extract(outputs.get(DETECTION_BOXES), DETECTION_BOXES, 3)?;

    collect_outputs(num, classes, scores, &box_shape, boxes)
}

// 把四个输出的数据拷贝为去掉批维度的数组
fn collect_outputs(
    num: &[f32],
    classes: &[f32],
    scores: &[f32],
    box_shape: &[usize],
    boxes: &[f32],
) -> Result<RawOutputs> {
    let num_detections = *num
        .first()
        .ok_or_else(|| ExampleError::Malformed(format!("{NUM_DETECTIONS} 为空")))?;

    let [_, rows, cols] = box_shape else {
        return Err(ExampleError::Malformed(format!(
            "{DETECTION_BOXES} 的形状 {box_shape:?} 不符合预期"
        )));
    };

    Ok(RawOutputs {
        num_detections,
        classes: Array1::from(classes.to_vec()),
        scores: Array1::from(scores.to_vec()),
        boxes: Array2::from_shape_vec((*rows, *cols), boxes.to_vec())?,
    })
}

// 取出一个f32输出，并校验维度数量和批大小
fn extract<'a>(
    value: Option<&'a DynValue>,
    name: &str,
    rank: usize,
) -> Result<(Vec<usize>, &'a [f32])> {
    let value = value.ok_or_else(|| ExampleError::Malformed(format!("模型没有输出 {name}")))?;
    let (shape, data) = value.try_extract_tensor::<f32>()?;
    let shape: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

    if shape.len() != rank || shape[0] != 1 {
        return Err(ExampleError::Malformed(format!(
            "{name} 的形状 {shape:?} 不符合预期"
        )));
    }
    Ok((shape, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(shape: [usize; 2], data: Vec<f32>) -> DynValue {
        Tensor::from_array((shape, data)).unwrap().into_dyn()
    }

    #[test]
    fn missing_output_is_malformed() {
        let err = extract(None, DETECTION_SCORES, 2).unwrap_err();
        assert!(matches!(err, ExampleError::Malformed(_)));
    }

    #[test]
    fn batch_larger_than_one_is_malformed() {
        let scores = value([2, 300], vec![0.0; 600]);
        let err = extract(Some(&scores), DETECTION_SCORES, 2).unwrap_err();
        assert!(matches!(err, ExampleError::Malformed(_)));
    }

    #[test]
    fn wrong_rank_is_malformed() {
        let boxes = value([1, 300], vec![0.0; 300]);
        let err = extract(Some(&boxes), DETECTION_BOXES, 3).unwrap_err();
        assert!(matches!(err, ExampleError::Malformed(_)));
    }

    #[test]
    fn matching_output_is_returned() {
        let scores = value([1, 3], vec![0.1, 0.2, 0.3]);
        let (shape, data) = extract(Some(&scores), DETECTION_SCORES, 2).unwrap();
        assert_eq!(shape, vec![1, 3]);
        assert_eq!(data, &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn boxes_drop_batch_dimension() {
        let boxes: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let outputs =
            collect_outputs(&[2.0], &[1.0, 3.0], &[0.9, 0.4], &[1, 2, 4], &boxes).unwrap();

        assert_eq!(outputs.num_detections, 2.0);
        assert_eq!(outputs.classes.to_vec(), vec![1.0, 3.0]);
        assert_eq!(outputs.scores.to_vec(), vec![0.9, 0.4]);
        assert_eq!(outputs.boxes.dim(), (2, 4));
        assert_eq!(outputs.boxes.row(1).to_vec(), vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn empty_count_or_bad_box_shape_is_malformed() {
        assert!(matches!(
            collect_outputs(&[], &[], &[], &[1, 0, 4], &[]),
            Err(ExampleError::Malformed(_))
        ));
        assert!(matches!(
            collect_outputs(&[1.0], &[1.0], &[0.5], &[1, 4], &[0.0; 4]),
            Err(ExampleError::Malformed(_))
        ));
    }

    #[test]
    fn box_data_shorter_than_shape_is_shape_error() {
        assert!(matches!(
            collect_outputs(&[1.0], &[1.0], &[0.5], &[1, 2, 4], &[0.0; 4]),
            Err(ExampleError::Shape(_))
        ));
    }
}
