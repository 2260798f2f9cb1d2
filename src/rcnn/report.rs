use std::io::{self, Write};

use crate::error::{ExampleError, Result};
use crate::rcnn::labels::Labels;
use crate::rcnn::table::DetectionTable;

const SEPARATOR: &str = "------------------";

/// 按行索引顺序输出检测结果
///
/// 每一行输出类别标签、置信度和四个坐标，最后是一行分隔符。
/// 任意一行的标签解析失败都会中止输出并返回错误。
pub fn write_report<W: Write>(table: &DetectionTable, labels: &Labels, out: &mut W) -> Result<()> {
    for (row, detection) in table.iter() {
        let label = table.label_for(row, labels)?;
        write_block(out, label, detection.score, [
            detection.ymin,
            detection.xmin,
            detection.ymax,
            detection.xmax,
        ])
        .map_err(ExampleError::Report)?;
    }
    Ok(())
}

/// 将检测结果输出到标准输出
pub fn print_report(table: &DetectionTable, labels: &Labels) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(table, labels, &mut out)
}

fn write_block<W: Write>(out: &mut W, label: &str, score: f32, bbox: [f32; 4]) -> io::Result<()> {
    let [ymin, xmin, ymax, xmax] = bbox.map(float_text);
    writeln!(out, "Detection class: {label}")?;
    writeln!(out, "Detection score: {}", float_text(score))?;
    writeln!(out, "ymin: {ymin}")?;
    writeln!(out, "xmin: {xmin}")?;
    writeln!(out, "ymax: {ymax}")?;
    writeln!(out, "xmax: {xmax}")?;
    writeln!(out, "{SEPARATOR}")
}

/// 浮点数文本格式：整数值保留 `.0`，绝对值小于1e-3或不小于1e7时使用 `1.0E-5` 形式
fn float_text(value: f32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if value == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let text = value.to_string();
        if text.contains('.') { text } else { format!("{text}.0") }
    } else {
        let text = format!("{value:E}");
        match text.split_once('E') {
            Some((mantissa, exponent)) if !mantissa.contains('.') => {
                format!("{mantissa}.0E{exponent}")
            }
            _ => text,
        }
    }
}
