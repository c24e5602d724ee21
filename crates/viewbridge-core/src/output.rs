/*
 * output.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Bundle script rendering.
 */

//! Bundle script rendering.
//!
//! Fills the fixed output-script skeleton with the assembled data:
//! optional engine runtime, namespace bootstrap, one assignment per
//! compiled view, and an AMD registration shim. The namespace bootstrap
//! is emitted as plain self-contained script text since the bundle must
//! run where nothing but its own code is guaranteed present. Rendering
//! is deterministic for a given input.

/// One compiled view ready for the output script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    /// Fully namespace-qualified function name (`APP.T.status.index`).
    pub name: String,
    /// Source text of the function expression.
    pub source: String,
}

/// Builds the bundle text section by section.
pub struct OutputBuilder {
    buffer: Vec<String>,
}

impl OutputBuilder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append a block comment, one line per message.
    fn comment(&mut self, lines: &[&str]) -> &mut Self {
        self.buffer.push("/*".to_string());
        for line in lines {
            self.buffer.push(format!(" * {}", line));
        }
        self.buffer.push(" */".to_string());
        self
    }

    /// Header comment and opening of the bundle's IIFE wrapper.
    pub fn intro(&mut self) -> &mut Self {
        self.comment(&[
            "Viewbridge",
            "==========",
            "Template functions exported via viewbridge",
        ]);
        self.buffer.push(";(function(window, undefined) {".to_string());
        self
    }

    /// Engine runtime script, verbatim.
    pub fn runtime(&mut self, engine_name: &str, runtime_js: &str) -> &mut Self {
        let title = format!("{} runtime", engine_name);
        let underline = "=".repeat(title.len());
        self.comment(&[&title, &underline]);
        self.buffer.push(runtime_js.to_string());
        self
    }

    /// Namespace bootstrap: ensure every dot-segment of each namespace
    /// exists as a nested object on the global root.
    pub fn namespaces(&mut self, namespaces: &[String]) -> &mut Self {
        self.comment(&["Namespaces", "----------"]);
        let quoted: Vec<String> = namespaces.iter().map(|ns| format!("'{}'", ns)).collect();
        self.buffer.push("var createNamespace = function(path) {".to_string());
        self.buffer.push("  var parts = path.split('.');".to_string());
        self.buffer.push("  var parent = window;".to_string());
        self.buffer.push("  for (var i = 0; i < parts.length; i++) {".to_string());
        self.buffer.push("    if (parent[parts[i]] == null) {".to_string());
        self.buffer.push("      parent[parts[i]] = {};".to_string());
        self.buffer.push("    }".to_string());
        self.buffer.push("    parent = parent[parts[i]];".to_string());
        self.buffer.push("  }".to_string());
        self.buffer.push("};".to_string());
        self.buffer
            .push(format!("var namespaces = [{}];", quoted.join(",")));
        self.buffer
            .push("for (var i = 0; i < namespaces.length; i++) {".to_string());
        self.buffer.push("  createNamespace(namespaces[i]);".to_string());
        self.buffer.push("}".to_string());
        self
    }

    /// One assignment per compiled view, in the given order.
    pub fn templates(&mut self, templates: &[CompiledTemplate]) -> &mut Self {
        self.comment(&["Template Functions", "------------------"]);
        for template in templates {
            self.comment(&[&format!("Template: {}()", template.name)]);
            self.buffer
                .push(format!("{} = {};", template.name, template.source));
        }
        self
    }

    /// AMD registration shim so the bundle can also be consumed as an
    /// anonymous module.
    pub fn amd(&mut self, root_namespace: &str) -> &mut Self {
        self.comment(&["AMD/RequireJS Support", "---------------------"]);
        self.buffer
            .push("if (typeof define === 'function' && define.amd) {".to_string());
        self.buffer.push("  define(function() {".to_string());
        self.buffer.push(format!("    return {};", root_namespace));
        self.buffer.push("  });".to_string());
        self.buffer.push("}".to_string());
        self
    }

    /// Close the IIFE wrapper.
    pub fn outro(&mut self) -> &mut Self {
        self.buffer.push("})(this);".to_string());
        self
    }

    /// The assembled bundle text.
    pub fn build(&self) -> String {
        let mut text = self.buffer.join("\n");
        text.push('\n');
        text
    }
}

impl Default for OutputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote text as a JS double-quoted string literal.
///
/// Escapes quotes, backslashes, control characters, and the JS line
/// separators U+2028/U+2029; `</` becomes `<\/` so the bundle stays
/// safe to inline in a script tag.
pub fn js_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let mut prev = '\0';
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '/' if prev == '<' => out.push_str("\\/"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
        prev = ch;
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_js_string_literal_escapes() {
        assert_eq!(js_string_literal("plain"), r#""plain""#);
        assert_eq!(js_string_literal("a\"b"), r#""a\"b""#);
        assert_eq!(js_string_literal("a\\b"), r#""a\\b""#);
        assert_eq!(js_string_literal("line1\nline2"), r#""line1\nline2""#);
        assert_eq!(js_string_literal("</script>"), r#""<\/script>""#);
        assert_eq!(js_string_literal("\u{2028}"), "\"\\u2028\"");
        assert_eq!(js_string_literal("col1\tcol2"), r#""col1\tcol2""#);
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let mut builder = OutputBuilder::new();
        builder
            .intro()
            .runtime("handlebars", "var Handlebars = {};")
            .namespaces(&["APP.T.status".to_string()])
            .templates(&[CompiledTemplate {
                name: "APP.T.status.index".to_string(),
                source: "function(data, partials) { return ''; }".to_string(),
            }])
            .amd("APP.T")
            .outro();
        let js = builder.build();

        let intro = js.find(";(function(window, undefined) {").unwrap();
        let runtime = js.find("var Handlebars = {};").unwrap();
        let namespaces = js.find("var namespaces = ['APP.T.status'];").unwrap();
        let template = js.find("APP.T.status.index = function").unwrap();
        let amd = js.find("define.amd").unwrap();
        let outro = js.find("})(this);").unwrap();
        assert!(intro < runtime);
        assert!(runtime < namespaces);
        assert!(namespaces < template);
        assert!(template < amd);
        assert!(amd < outro);
    }

    #[test]
    fn test_runtime_section_is_omittable() {
        let mut builder = OutputBuilder::new();
        builder
            .intro()
            .namespaces(&["viewbridge".to_string()])
            .templates(&[])
            .amd("viewbridge")
            .outro();
        let js = builder.build();
        assert!(!js.contains("runtime"));
        assert!(js.contains("var namespaces = ['viewbridge'];"));
    }

    #[test]
    fn test_template_assignment_statement() {
        let mut builder = OutputBuilder::new();
        builder.templates(&[CompiledTemplate {
            name: "viewbridge.about".to_string(),
            source: "(function() { return function(data, partials) { return ''; }; })()"
                .to_string(),
        }]);
        let js = builder.build();
        assert!(js.contains("/*\n * Template: viewbridge.about()\n */"));
        assert!(js.contains("viewbridge.about = (function() {"));
        assert!(js.trim_end().ends_with("})();"));
    }
}
