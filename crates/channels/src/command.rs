/// A parsed bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `<prefix>help`
    Help,
    /// `<prefix>match <queue>`; the argument is everything after the single
    /// space, unmodified.
    Match { queue: &'a str },
    /// Starts with the prefix but is not a known command.
    Invalid,
}

const HELP: &str = "help";
const MATCH: &str = "match ";

impl<'a> Command<'a> {
    /// Parse `text`, or return `None` if it does not start with `prefix`.
    pub fn parse(text: &'a str, prefix: char) -> Option<Self> {
        let rest = text.strip_prefix(prefix)?;

        if rest == HELP {
            return Some(Self::Help);
        }
        if let Some(queue) = rest.strip_prefix(MATCH) {
            return Some(Self::Match { queue });
        }
        Some(Self::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case::help("%help", Some(Command::Help))]
    #[case::match_pair("%match 2-cam", Some(Command::Match { queue: "2-cam" }))]
    #[case::match_keeps_argument_verbatim(
        "%match  3-cam ",
        Some(Command::Match { queue: " 3-cam " })
    )]
    #[case::match_empty_argument("%match ", Some(Command::Match { queue: "" }))]
    #[case::match_without_space("%match", Some(Command::Invalid))]
    #[case::match_no_separator("%match2-cam", Some(Command::Invalid))]
    #[case::help_with_suffix("%help me", Some(Command::Invalid))]
    #[case::uppercase("%HELP", Some(Command::Invalid))]
    #[case::bare_prefix("%", Some(Command::Invalid))]
    #[case::no_prefix("help", None)]
    #[case::prefix_not_first(" %help", None)]
    #[case::other_prefix("!help", None)]
    fn parses(#[case] text: &str, #[case] expected: Option<Command<'static>>) {
        assert_eq!(Command::parse(text, '%'), expected);
    }

    #[test]
    fn custom_prefix() {
        assert_eq!(Command::parse("!help", '!'), Some(Command::Help));
        assert_eq!(Command::parse("%help", '!'), None);
    }

    #[test]
    fn multibyte_prefix() {
        assert_eq!(
            Command::parse("§match 2-cam", '§'),
            Some(Command::Match { queue: "2-cam" })
        );
    }
}
