use nu_ansi_term::{Color, Style};
use paramql::{Operand, Order, Predicate};
use std::fmt::Display;
use std::io::IsTerminal;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Theme {
    Auto,
    Light,
    Dark,
    Plain,
}

pub struct Ui {
    palette: Palette,
    paint: bool,
}

impl Ui {
    pub fn new(theme: Theme) -> Self {
        let paint = match theme {
            Theme::Plain => false,
            Theme::Auto | Theme::Light | Theme::Dark => std::io::stdout().is_terminal(),
        };

        #[cfg(windows)]
        if paint {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        let palette = match theme {
            Theme::Plain => Palette::plain(),
            Theme::Light => Palette::light(),
            Theme::Dark | Theme::Auto => Palette::dark(),
        };
        Self { palette, paint }
    }

    pub fn heading(&self, title: &str) {
        if self.paint {
            println!("{}", self.palette.heading.paint(title));
        } else {
            println!("{title}");
        }
    }

    pub fn row<K: Display, V: Display>(&self, key: K, value: V) {
        if self.paint {
            println!(
                "  {} {}",
                self.palette.key.paint(key.to_string()),
                self.palette.value.paint(value.to_string())
            );
        } else {
            println!("  {key} {value}");
        }
    }

    pub fn predicate(&self, predicate: &Predicate) {
        let operand = match predicate.value() {
            Operand::None => String::new(),
            Operand::Single(value) => value.to_string(),
            Operand::Many(values) => {
                let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                format!("[{}]", rendered.join(", "))
            }
        };
        let path = predicate.attributes().path();
        if self.paint {
            println!(
                "  {} {} {}",
                self.palette.key.paint(path),
                self.palette.accent.paint(predicate.comparator().symbol()),
                self.palette.value.paint(operand)
            );
        } else {
            println!("  {} {} {}", path, predicate.comparator(), operand);
        }
    }

    pub fn order(&self, order: &Order) {
        self.row(order.attributes().path(), order.direction());
    }

    pub fn empty(&self, what: &str) {
        let line = format!("  (no {what})");
        if self.paint {
            println!("{}", self.palette.muted.paint(line));
        } else {
            println!("{line}");
        }
    }
}

struct Palette {
    heading: Style,
    key: Style,
    value: Style,
    accent: Style,
    muted: Style,
}

impl Palette {
    fn dark() -> Self {
        Self {
            heading: Style::new().bold().fg(Color::Cyan),
            key: Style::new().fg(Color::LightBlue),
            value: Style::new().fg(Color::White),
            accent: Style::new().bold().fg(Color::Yellow),
            muted: Style::new().fg(Color::DarkGray),
        }
    }

    fn light() -> Self {
        Self {
            heading: Style::new().bold().fg(Color::Blue),
            key: Style::new().fg(Color::Purple),
            value: Style::new().fg(Color::Black),
            accent: Style::new().bold().fg(Color::Red),
            muted: Style::new().fg(Color::DarkGray),
        }
    }

    fn plain() -> Self {
        Self {
            heading: Style::new(),
            key: Style::new(),
            value: Style::new(),
            accent: Style::new(),
            muted: Style::new(),
        }
    }
}
