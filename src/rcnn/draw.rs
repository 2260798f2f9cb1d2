use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use log::info;
use raqote::{DrawOptions, DrawTarget, LineJoin, PathBuilder, SolidSource, Source, StrokeStyle};

use crate::config::{BOX_COLORS, BOX_STROKE_WIDTH, JPEG_QUALITY};
use crate::error::{ExampleError, Result};
use crate::rcnn::table::DetectionTable;

/// 在图像上绘制检测结果
///
/// 结果表中的坐标是比例值，绘制前换算为像素坐标。
/// 颜色按行顺序在三种颜色之间循环。
///
/// # 参数
/// * `image` - 原始图像
/// * `table` - 检测结果表
///
/// # 返回值
/// 返回绘制了检测框的图像
pub fn draw_detections(image: &DynamicImage, table: &DetectionTable) -> DynamicImage {
    let (img_width, img_height) = image.dimensions();
    let mut dt = DrawTarget::new(img_width as i32, img_height as i32);

    // 将原始图像绘制到DrawTarget上
    let rgba_image = image.to_rgba8();
    let image_data: Vec<u32> = rgba_image
        .chunks(4)
        .map(|pixel| u32::from_le_bytes([pixel[2], pixel[1], pixel[0], pixel[3]]))
        .collect();

    let img = raqote::Image {
        width: img_width as i32,
        height: img_height as i32,
        data: &image_data,
    };
    dt.draw_image_at(0.0, 0.0, &img, &DrawOptions::new());

    let (w, h) = (img_width as f32, img_height as f32);
    for (i, (_, detection)) in table.iter().enumerate() {
        let x1 = detection.xmin * w;
        let y1 = detection.ymin * h;
        let x2 = detection.xmax * w;
        let y2 = detection.ymax * h;

        let mut pb = PathBuilder::new();
        pb.rect(x1, y1, x2 - x1, y2 - y1);
        let path = pb.finish();

        dt.stroke(
            &path,
            &Source::Solid(box_color(i)),
            &StrokeStyle {
                join: LineJoin::Round,
                width: BOX_STROKE_WIDTH,
                ..StrokeStyle::default()
            },
            &DrawOptions::default(),
        );
    }

    // 将DrawTarget转换回图像
    let pixels: Vec<u8> = dt
        .get_data()
        .iter()
        .flat_map(|&pixel| {
            let bytes = pixel.to_le_bytes();
            [bytes[2], bytes[1], bytes[0], bytes[3]] // BGRA to RGBA
        })
        .collect();

    match image::RgbaImage::from_raw(img_width, img_height, pixels) {
        Some(buffer) => DynamicImage::ImageRgba8(buffer),
        // 缓冲区长度由DrawTarget尺寸决定，不会走到这里
        None => image.clone(),
    }
}

/// 以最高质量保存为JPEG
pub fn save_jpeg(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ExampleError::io(path, e))?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    encoder.encode_image(&image.to_rgb8())?;
    info!("结果已保存到: {:?}", path);
    Ok(())
}

fn box_color(i: usize) -> SolidSource {
    let [r, g, b] = BOX_COLORS[i % BOX_COLORS.len()];
    SolidSource {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
        a: 0xFF,
    }
}
