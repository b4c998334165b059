use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Title line plus aligned `label: value` fields.
///
/// Adding a label twice lists the second value under the first, without
/// repeating the label.
#[derive(Debug, Clone)]
pub struct CommandHeader {
    icon: Icon,
    title: String,
    fields: Vec<(String, Vec<String>)>,
}

impl CommandHeader {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn add(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((label, vec![value])),
        }
    }

    fn label_width(&self) -> usize {
        self.fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = ColoredText::info(self.title.as_str()).bold().render(supports_color);
        let mut out = format!("{} {}\n", self.icon.colored(supports_color, supports_unicode), title);

        let width = self.label_width();
        for (label, values) in &self.fields {
            let pad = " ".repeat(width - label.chars().count());
            for (i, value) in values.iter().enumerate() {
                let key = if i == 0 {
                    format!("{}:{}", label, pad)
                } else {
                    " ".repeat(width + 1)
                };
                out.push_str(&format!(
                    "{} {}\n",
                    ColoredText::dim(key).render(supports_color),
                    value
                ));
            }
        }
        out
    }
}
