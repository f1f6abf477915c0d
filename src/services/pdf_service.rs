//! PDF 渲染服务 - 业务能力层
//!
//! 把解析出的练习题记录排版成一份分页的学习指南 PDF。
//!
//! 使用 printpdf 的内置 Helvetica 字体，不依赖磁盘上的字体文件。
//! 内置字体只支持 WinAnsi 字符集，所以所有文本先经过
//! [`to_winansi`] 转写：无法表示的字符替换为 '?'，而不是拒绝渲染，
//! 避免 LLM 输出的意外字符导致整个流水线失败。

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};
use tracing::debug;

use crate::models::guide::PracticeQuestion;

// ========== 页面参数（A4，单位毫米） ==========

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// 1pt ≈ 0.3528mm
const PT_TO_MM: f32 = 0.3528;

/// Helvetica 平均字符宽度约为 0.5em，用于估算居中位置和折行宽度
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// PDF 渲染服务
pub struct PdfService;

impl PdfService {
    pub fn new() -> Self {
        Self
    }

    /// 渲染学习指南 PDF 并写入 `path`
    ///
    /// `records` 可以为空：此时只渲染标题部分和空的练习题章节
    pub fn render(
        &self,
        path: &Path,
        quiz_title: &str,
        student_name: &str,
        records: &[PracticeQuestion],
    ) -> Result<()> {
        let (doc, page, layer) = PdfDocument::new(
            "Personalized Study Guide",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Page 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("无法加载内置字体: {}", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow::anyhow!("无法加载内置字体: {}", e))?;

        let mut writer = PageWriter {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            page_count: 1,
        };

        // 标题部分
        writer.centered_line(
            &to_winansi(&format!(
                "Your Personalized Study Guide for: {}",
                quiz_title
            )),
            16.0,
            &bold,
        );
        writer.centered_line(&to_winansi(student_name), 12.0, &regular);
        writer.gap();

        // 练习题章节（记录为空时章节保持为空）
        writer.line("Practice Questions", 14.0, &bold);
        writer.gap();

        for (i, record) in records.iter().enumerate() {
            writer.wrapped_line(
                &to_winansi(&format!("{}. Fundamental Topic: {}", i + 1, record.topic)),
                11.0,
                &bold,
            );
            writer.wrapped_line(&to_winansi(&record.question), 11.0, &regular);
            for (letter, option) in ["A", "B", "C", "D"].iter().zip(record.options.iter()) {
                writer.wrapped_line(
                    &to_winansi(&format!("{}) {}", letter, option)),
                    11.0,
                    &regular,
                );
            }

            // 正确答案行用绿色，随后恢复黑色
            writer
                .layer
                .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.45, 0.13, None)));
            writer.line(
                &format!("Correct Answer: {}", record.correct_letter),
                11.0,
                &regular,
            );
            writer
                .layer
                .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            writer.gap();
        }

        let file = File::create(path)
            .with_context(|| format!("无法创建 PDF 文件: {}", path.display()))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| anyhow::anyhow!("无法写入 PDF 文件 {}: {}", path.display(), e))?;

        debug!("✓ 学习指南 PDF 已写入: {}", path.display());
        Ok(())
    }
}

impl Default for PdfService {
    fn default() -> Self {
        Self::new()
    }
}

/// 按页写入文本行，写满一页自动换页
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    page_count: usize,
}

impl PageWriter<'_> {
    fn ensure_space(&mut self) {
        if self.y < MARGIN_MM {
            self.page_count += 1;
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", self.page_count),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn line(&mut self, text: &str, font_size: f32, font: &IndirectFontRef) {
        self.ensure_space();
        self.layer
            .use_text(text, font_size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= LINE_HEIGHT_MM;
    }

    fn centered_line(&mut self, text: &str, font_size: f32, font: &IndirectFontRef) {
        self.ensure_space();
        let width_mm = estimate_width_mm(text, font_size);
        let x = ((PAGE_WIDTH_MM - width_mm) / 2.0).max(MARGIN_MM);
        self.layer.use_text(text, font_size, Mm(x), Mm(self.y), font);
        self.y -= LINE_HEIGHT_MM;
    }

    /// 超出可用宽度的文本按词折行
    fn wrapped_line(&mut self, text: &str, font_size: f32, font: &IndirectFontRef) {
        let usable_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let char_mm = font_size * AVG_CHAR_WIDTH_EM * PT_TO_MM;
        let max_chars = (usable_mm / char_mm).max(1.0) as usize;

        for line in wrap_text(text, max_chars) {
            self.line(&line, font_size, font);
        }
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT_MM / 2.0;
    }
}

/// 估算一行文本的宽度（毫米）
fn estimate_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH_EM * PT_TO_MM
}

/// 按词折行，单行最多 `max_chars` 个字符
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// 把文本转写到 WinAnsi 可渲染的字符子集
///
/// 常见的排版字符映射为 ASCII 等价形式，Latin-1 范围保留，
/// 其余字符替换为 '?'（替换而不是拒绝）
pub fn to_winansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => {
                out.push('-')
            }
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2009}' => out.push(' '),
            c if c.is_control() => out.push(' '),
            c if c.is_ascii() => out.push(c),
            c if (c as u32) >= 0xA1 && (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
