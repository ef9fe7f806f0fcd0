//! Page shell template.

use minijinja::{context, Environment};

/// Shell for exporting a live page as a standalone HTML document.
pub struct PageShell {
    env: Environment<'static>,
}

impl PageShell {
    /// Create the shell with its built-in template.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template_owned("shell.html".to_string(), SHELL_TEMPLATE.to_string())
            .expect("built-in shell template is valid");
        Self { env }
    }

    /// Render the shell around serialized page content.
    pub fn render(&self, title: &str, content: &str) -> Result<String, minijinja::Error> {
        let template = self.env.get_template("shell.html")?;
        template.render(context! {
            title => title,
            content => content,
        })
    }
}

impl Default for PageShell {
    fn default() -> Self {
        Self::new()
    }
}

const SHELL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
</head>
{{ content | safe }}
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_shell_around_content() {
        let shell = PageShell::new();

        let html = shell
            .render("Patterns", "<body><p>hello</p></body>")
            .unwrap();

        assert!(html.contains("<title>Patterns</title>"));
        assert!(html.contains("<p>hello</p>"));
    }

    #[test]
    fn escapes_the_title() {
        let shell = PageShell::new();

        let html = shell.render("a < b", "<body></body>").unwrap();

        assert!(html.contains("a &lt; b"));
    }
}
