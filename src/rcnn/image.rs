use image::DynamicImage;
use ndarray::Array4;
use std::io;
use std::path::Path;

use crate::error::{ExampleError, Result};

/// 加载图像文件
///
/// 从指定路径加载JPEG等格式的图像文件。
///
/// # 参数
/// * `path` - 图像文件路径
///
/// # 返回值
/// 返回加载的DynamicImage对象
///
/// # 错误处理
/// 文件不存在时返回 `ExampleError::Io`，解码失败时返回 `ExampleError::Image`
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    // 验证路径是否有效
    let path = path.as_ref();
    if !path.exists() {
        return Err(ExampleError::io(
            path,
            io::Error::new(io::ErrorKind::NotFound, "图像文件不存在"),
        ));
    }

    Ok(image::open(path)?)
}

/// 将图像转换为模型输入张量
///
/// Faster R-CNN 的签名接收未归一化的 uint8 像素，维度顺序为NHWC。
///
/// # 参数
/// * `img` - 图像
///
/// # 返回值
/// 返回形状为(1, height, width, 3)的四维张量，通道顺序为RGB
///
/// # 示例
///
/// ```
/// use image::DynamicImage;
/// use model_examples::image_to_tensor;
///
/// let img = DynamicImage::new_rgb8(64, 32);
/// let tensor = image_to_tensor(&img);
/// assert_eq!(tensor.shape(), &[1, 32, 64, 3]);
/// ```
pub fn image_to_tensor(img: &DynamicImage) -> Array4<u8> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    Array4::from_shape_fn((1, height as usize, width as usize, 3), |(_, y, x, c)| {
        rgb.get_pixel(x as u32, y as u32).0[c]
    })
}
