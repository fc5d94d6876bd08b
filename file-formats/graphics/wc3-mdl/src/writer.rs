//! Indent-aware text writer for MDL output.
//!
//! One tab per nesting level, every statement terminated by `,`, scope
//! closers written bare.

use std::fmt::Write;

pub struct MdlWriter {
    out: String,
    depth: usize,
}

impl MdlWriter {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            depth: 0,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    /// `// text` on its own line
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            self.indent();
            self.out.push_str("// ");
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    /// `header {` and one level deeper
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.indent();
        self.out.push_str(header.as_ref());
        self.out.push_str(" {\n");
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("}\n");
    }

    /// `statement,`
    pub fn field(&mut self, statement: impl AsRef<str>) {
        self.indent();
        self.out.push_str(statement.as_ref());
        self.out.push_str(",\n");
    }

    /// `statement,` one level deeper than the current scope (tangents)
    pub fn nested_field(&mut self, statement: impl AsRef<str>) {
        self.depth += 1;
        self.field(statement);
        self.depth -= 1;
    }

    /// `Keyword value,`
    pub fn keyed(&mut self, keyword: &str, value: impl AsRef<str>) {
        self.indent();
        let _ = writeln!(self.out, "{keyword} {},", value.as_ref());
    }

    /// `Keyword "text",`
    pub fn quoted(&mut self, keyword: &str, text: &str) {
        self.indent();
        let _ = writeln!(self.out, "{keyword} \"{text}\",");
    }

    /// `Keyword { x, y, z },`
    pub fn vector(&mut self, keyword: &str, components: &[f32]) {
        self.keyed(keyword, format_vector(components));
    }

    /// `Keyword 1.5,`
    pub fn float(&mut self, keyword: &str, value: f32) {
        self.keyed(keyword, format_float(value));
    }

    pub fn int(&mut self, keyword: &str, value: impl std::fmt::Display) {
        self.keyed(keyword, value.to_string());
    }

    /// Bare `Keyword,` when the flag is set
    pub fn flag(&mut self, keyword: &str, set: bool) {
        if set {
            self.field(keyword);
        }
    }
}

impl Default for MdlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// `%.6f` with trailing zeros and a trailing `.` stripped
pub fn format_float(value: f32) -> String {
    let mut s = format!("{:.6}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.truncate(0);
        s.push('0');
    }
    s
}

/// `{ a, b, c }`
pub fn format_vector(components: &[f32]) -> String {
    if components.is_empty() {
        return "{ }".to_string();
    }
    let parts: Vec<String> = components.iter().map(|c| format_float(*c)).collect();
    format!("{{ {} }}", parts.join(", "))
}

/// `{ 0, 1, 2 }` for integer lists
pub fn format_int_list<T: std::fmt::Display>(values: &[T]) -> String {
    if values.is_empty() {
        return "{ }".to_string();
    }
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("{{ {} }}", parts.join(", "))
}
