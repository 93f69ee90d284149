//! Languages of the Last.fm website

use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages the Last.fm website is localized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SiteLanguage {
    #[default]
    English,
    German,
    Spanish,
    French,
    Italian,
    Polish,
    Portuguese,
    Swedish,
    Turkish,
    Russian,
    Japanese,
    Chinese,
}

impl SiteLanguage {
    pub const ALL: [SiteLanguage; 12] = [
        SiteLanguage::English,
        SiteLanguage::German,
        SiteLanguage::Spanish,
        SiteLanguage::French,
        SiteLanguage::Italian,
        SiteLanguage::Polish,
        SiteLanguage::Portuguese,
        SiteLanguage::Swedish,
        SiteLanguage::Turkish,
        SiteLanguage::Russian,
        SiteLanguage::Japanese,
        SiteLanguage::Chinese,
    ];

    /// Native names of the language; the first one is used for display
    pub fn texts(self) -> &'static [&'static str] {
        match self {
            SiteLanguage::English => &["English"],
            SiteLanguage::German => &["Deutsch"],
            SiteLanguage::Spanish => &["Español"],
            SiteLanguage::French => &["Français"],
            SiteLanguage::Italian => &["Italiano"],
            SiteLanguage::Polish => &["Polszczyzna"],
            SiteLanguage::Portuguese => &["Português"],
            SiteLanguage::Swedish => &["Svenska"],
            SiteLanguage::Turkish => &["Türkçe"],
            SiteLanguage::Russian => &["русский язык"],
            SiteLanguage::Japanese => &["Nihongo", "日本語"],
            SiteLanguage::Chinese => &["Zhōngwén", "中文"],
        }
    }

    /// Host of the localized website
    pub fn domain(self) -> &'static str {
        match self {
            SiteLanguage::English => "www.last.fm",
            SiteLanguage::German => "www.lastfm.de",
            SiteLanguage::Spanish => "www.lastfm.es",
            SiteLanguage::French => "www.lastfm.fr",
            SiteLanguage::Italian => "www.lastfm.it",
            SiteLanguage::Polish => "www.lastfm.pl",
            SiteLanguage::Portuguese => "www.lastfm.com.br",
            SiteLanguage::Swedish => "www.lastfm.se",
            SiteLanguage::Turkish => "www.lastfm.com.tr",
            SiteLanguage::Russian => "www.lastfm.ru",
            SiteLanguage::Japanese => "www.lastfm.jp",
            SiteLanguage::Chinese => "cn.last.fm",
        }
    }

    /// ISO 639 alpha-2 code
    pub fn code(self) -> &'static str {
        match self {
            SiteLanguage::English => "en",
            SiteLanguage::German => "de",
            SiteLanguage::Spanish => "es",
            SiteLanguage::French => "fr",
            SiteLanguage::Italian => "it",
            SiteLanguage::Polish => "pl",
            SiteLanguage::Portuguese => "pt",
            SiteLanguage::Swedish => "sv",
            SiteLanguage::Turkish => "tr",
            SiteLanguage::Russian => "ru",
            SiteLanguage::Japanese => "ja",
            SiteLanguage::Chinese => "zh",
        }
    }

    /// Look up a language by ISO 639 code (case-insensitive, region suffix ignored)
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        Self::ALL.into_iter().find(|lang| lang.code() == primary)
    }
}

impl fmt::Display for SiteLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.texts()[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_english() {
        assert_eq!(SiteLanguage::default(), SiteLanguage::English);
        assert_eq!(SiteLanguage::English.domain(), "www.last.fm");
    }

    #[test]
    fn test_multiple_texts() {
        assert_eq!(SiteLanguage::Japanese.texts(), &["Nihongo", "日本語"]);
        assert_eq!(SiteLanguage::Chinese.to_string(), "Zhōngwén");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(SiteLanguage::from_code("de"), Some(SiteLanguage::German));
        assert_eq!(SiteLanguage::from_code("PT-br"), Some(SiteLanguage::Portuguese));
        assert_eq!(SiteLanguage::from_code("zh_CN"), Some(SiteLanguage::Chinese));
        assert_eq!(SiteLanguage::from_code("xx"), None);
        assert_eq!(SiteLanguage::from_code(""), None);
    }

    #[rstest]
    #[case(SiteLanguage::English, "www.last.fm")]
    #[case(SiteLanguage::German, "www.lastfm.de")]
    #[case(SiteLanguage::Japanese, "www.lastfm.jp")]
    #[case(SiteLanguage::Chinese, "cn.last.fm")]
    fn test_domains(#[case] language: SiteLanguage, #[case] domain: &str) {
        assert_eq!(language.domain(), domain);
    }

    #[test]
    fn test_codes_are_unique() {
        for lang in SiteLanguage::ALL {
            assert_eq!(SiteLanguage::from_code(lang.code()), Some(lang));
        }
    }
}
