//! Keyword-matched themes counted by the analysis stage.
//!
//! Each theme is a name plus a list of English and Arabic keywords. Themes
//! whose name starts with `country_` are reported in their own section.

/// Prefix that marks a theme as a country mention.
pub const COUNTRY_PREFIX: &str = "country_";

/// Punctuation that is split off words before matching.
const SPLIT_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')', '[', ']', '{', '}'];

/// A named group of keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

impl Theme {
    pub fn is_country(&self) -> bool {
        self.name.starts_with(COUNTRY_PREFIX)
    }

    /// Human-readable name: `customer_service` → `Customer Service`,
    /// `country_saudi_arabia` → `Saudi Arabia`.
    pub fn display_name(&self) -> String {
        let base = self.name.strip_prefix(COUNTRY_PREFIX).unwrap_or(self.name);
        crate::formatting::title_case(&base.replace('_', " "))
    }

    /// `true` when any keyword of this theme occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        contains_keywords(text, self.keywords)
    }
}

/// The full theme table, service themes first.
pub const THEMES: &[Theme] = &[
    Theme {
        name: "Customer Identification",
        keywords: &["passport", "id", "identification", "باسبور", "جواز", "هوية", "توثيق"],
    },
    Theme {
        name: "fees",
        keywords: &[
            "fee", "fees", "commission", "cost", "pricing", "رسوم", "عموله", "عمولة", "تكلفة", "مصاريف",
        ],
    },
    Theme {
        name: "withdrawal",
        keywords: &["withdraw", "withdrawal", "اسحب", "سحب"],
    },
    Theme {
        name: "account_activation",
        keywords: &["activate", "activation", "تفعيل", "تنشيط"],
    },
    Theme {
        name: "integration_apps",
        keywords: &[
            "integration",
            "integrate",
            "api",
            "link",
            "connect",
            "الربط",
            "بوابة دفع",
            "ربط",
            "توافق",
            "stripe",
            "paypal",
            "shopify",
        ],
    },
    Theme {
        name: "customer_service",
        keywords: &[
            "support",
            "customer service",
            "help",
            "contact",
            "دعم",
            "خدمة العملاء",
            "تواصل",
            "مساعدة",
            "التواصل",
            "الدعم",
        ],
    },
    Theme { name: "country_sudan", keywords: &["sudan", "السودان"] },
    Theme { name: "country_yemen", keywords: &["yemen", "اليمن"] },
    Theme { name: "country_turkey", keywords: &["turkey", "تركيا"] },
    Theme { name: "country_saudi_arabia", keywords: &["saudi", "saudi arabia", "السعودية"] },
    Theme { name: "country_iraq", keywords: &["iraq", "العراق"] },
    Theme { name: "country_algeria", keywords: &["algeria", "الجزائر"] },
    Theme { name: "country_egypt", keywords: &["egypt", "مصر"] },
    Theme { name: "country_lebanon", keywords: &["lebanon", "لبنان"] },
    Theme { name: "country_syria", keywords: &["syria", "سوريا"] },
    Theme { name: "country_morocco", keywords: &["morocco", "المغرب"] },
    Theme { name: "country_tunisia", keywords: &["tunisia", "تونس"] },
    Theme { name: "country_palestine", keywords: &["palestine", "فلسطين", "gaza", "غزة"] },
    Theme { name: "country_oman", keywords: &["oman", "عمان"] },
    Theme { name: "country_jordan", keywords: &["jordan", "الأردن"] },
    Theme { name: "country_kuwait", keywords: &["kuwait", "الكويت"] },
    Theme { name: "country_bahrain", keywords: &["bahrain", "البحرين"] },
    Theme { name: "country_qatar", keywords: &["qatar", "قطر"] },
    Theme { name: "country_uae", keywords: &["uae", "الإمارة العربية المتحدة"] },
    Theme { name: "country_bangladesh", keywords: &["bangladesh", "بنغلاديش"] },
    Theme { name: "country_india", keywords: &["india", "الهند"] },
    Theme { name: "country_pakistan", keywords: &["pakistan", "باكستان"] },
    Theme { name: "country_nepal", keywords: &["nepal", "نيبال"] },
    Theme { name: "country_afghanistan", keywords: &["afghanistan", "أفغانستان"] },
    Theme { name: "country_iran", keywords: &["iran", "إيران"] },
];

/// Lowercase `text`, split punctuation off, and break it into words.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(text.len() + 16);
    for c in text.to_lowercase().chars() {
        if SPLIT_PUNCTUATION.contains(&c) {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }
    spaced.split_whitespace().map(str::to_string).collect()
}

/// `true` when any keyword occurs in `text` as a whole word, or for
/// multi-word keywords as a run of consecutive words.
pub fn contains_keywords(text: &str, keywords: &[&str]) -> bool {
    let words = tokenize(text);
    keywords.iter().any(|keyword| {
        let needle = tokenize(keyword);
        match needle.len() {
            0 => false,
            1 => words.iter().any(|w| *w == needle[0]),
            n => words.windows(n).any(|window| window == needle.as_slice()),
        }
    })
}

/// Service (non-country) themes in table order.
pub fn service_themes() -> impl Iterator<Item = &'static Theme> {
    THEMES.iter().filter(|t| !t.is_country())
}

/// Country themes in table order.
pub fn country_themes() -> impl Iterator<Item = &'static Theme> {
    THEMES.iter().filter(|t| t.is_country())
}
