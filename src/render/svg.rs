//! SVG drawing surface
//!
//! Elements are appended in drawing order; `clear` drops everything drawn so
//! far so every render starts from an empty surface.

use std::fmt::{Display, Write};

/// Escape text for use in XML content and attribute values
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Round to two decimals for compact output
pub fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
    open: Vec<&'static str>,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            open: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn clear(&mut self) {
        self.body.clear();
        self.open.clear();
    }

    /// Start an element; finish it with [`Element::draw`] or [`Element::open`]
    pub fn element(&mut self, tag: &'static str) -> Element<'_> {
        Element {
            canvas: self,
            tag,
            attrs: String::new(),
            style: String::new(),
            text: None,
            title: None,
        }
    }

    /// Close the most recently opened container element
    pub fn close(&mut self) {
        if let Some(tag) = self.open.pop() {
            let _ = write!(self.body, "</{}>", tag);
        }
    }

    /// Serialize the surface, closing any container left open
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart" width="{}" height="{}" viewBox="0 0 {} {}">{}</svg>"#,
            num(self.width),
            num(self.height),
            num(self.width),
            num(self.height),
            self.body
        )
    }
}

pub struct Element<'a> {
    canvas: &'a mut SvgCanvas,
    tag: &'static str,
    attrs: String,
    style: String,
    text: Option<String>,
    title: Option<String>,
}

impl<'a> Element<'a> {
    pub fn attr(mut self, name: &str, value: impl Display) -> Self {
        let _ = write!(self.attrs, r#" {}="{}""#, name, escape(&value.to_string()));
        self
    }

    /// Numeric attribute rounded for output
    pub fn num(self, name: &str, value: f64) -> Self {
        self.attr(name, num(value))
    }

    pub fn style(mut self, name: &str, value: impl Display) -> Self {
        let _ = write!(self.style, "{}:{};", name, value);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(escape(text));
        self
    }

    /// Native tooltip shown on hover
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(escape(title));
        self
    }

    /// Emit a leaf element
    pub fn draw(self) {
        let Element {
            canvas,
            tag,
            attrs,
            style,
            text,
            title,
        } = self;
        let _ = write!(canvas.body, "<{}{}", tag, attrs);
        if !style.is_empty() {
            let _ = write!(canvas.body, r#" style="{}""#, escape(&style));
        }
        if text.is_none() && title.is_none() {
            canvas.body.push_str("/>");
            return;
        }
        canvas.body.push('>');
        if let Some(title) = title {
            let _ = write!(canvas.body, "<title>{}</title>", title);
        }
        if let Some(text) = text {
            canvas.body.push_str(&text);
        }
        let _ = write!(canvas.body, "</{}>", tag);
    }

    /// Emit the start tag of a container; children follow until [`SvgCanvas::close`]
    pub fn open(self) {
        let Element {
            canvas,
            tag,
            attrs,
            style,
            title,
            ..
        } = self;
        let _ = write!(canvas.body, "<{}{}", tag, attrs);
        if !style.is_empty() {
            let _ = write!(canvas.body, r#" style="{}""#, escape(&style));
        }
        canvas.body.push('>');
        if let Some(title) = title {
            let _ = write!(canvas.body, "<title>{}</title>", title);
        }
        canvas.open.push(tag);
    }
}

/// d3-style band scale with equal inner and outer padding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(count: usize, range: f64, padding: f64) -> Self {
        let n = count as f64;
        let step = range / (n - padding + 2.0 * padding).max(1.0);
        let start = (range - step * (n - padding)) / 2.0;
        Self {
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}
