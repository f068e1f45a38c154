//! Template directive tags

/// Every element tag the expansion engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Source,
    Header,
    Expand,
    Var,
    Enum,
    ExpandData,
}

impl Directive {
    pub const ALL: [Directive; 6] = [
        Directive::Source,
        Directive::Header,
        Directive::Expand,
        Directive::Var,
        Directive::Enum,
        Directive::ExpandData,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Directive::Source => "source",
            Directive::Header => "header",
            Directive::Expand => "expand",
            Directive::Var => "var",
            Directive::Enum => "enum",
            Directive::ExpandData => "expand_data",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for directive in Directive::ALL {
            assert_eq!(Directive::from_tag(directive.tag()), Some(directive));
        }
        assert_eq!(Directive::from_tag("row"), None);
        assert_eq!(Directive::from_tag("Expand"), None);
    }
}
