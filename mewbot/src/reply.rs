//! Mise en forme BBCode des réponses TeamSpeak

/// Ton d'une réponse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

pub fn render(tone: Tone, msg: &str) -> String {
    match tone {
        Tone::Info => msg.to_string(),
        Tone::Success => bold(&colored("green", msg)),
        Tone::Warning => bold(msg),
        Tone::Error => bold(&colored("red", msg)),
    }
}

pub fn colored(color: &str, msg: &str) -> String {
    format!("[color={}]{}[/color]", color, msg)
}

pub fn bold(msg: &str) -> String {
    format!("[b]{}[/b]", msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(render(Tone::Info, "你好"), "你好");
        assert_eq!(render(Tone::Success, "好"), "[b][color=green]好[/color][/b]");
        assert_eq!(render(Tone::Error, "坏"), "[b][color=red]坏[/color][/b]");
        assert_eq!(render(Tone::Warning, "注意"), "[b]注意[/b]");
    }
}
