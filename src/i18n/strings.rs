/// Localized strings shown on emergency placeholder screens.
///
/// Placeholders: `{content_id}`, `{language}`
#[derive(Debug, Clone)]
pub struct PlaceholderStrings {
    /// Short heading (e.g., "Content not available")
    pub title: &'static str,

    /// Body text naming the content and the requested language
    pub message: &'static str,
}

impl PlaceholderStrings {
    /// Fill the message placeholders.
    pub fn render_message(&self, content_id: &str, language: &str) -> String {
        self.message
            .replace("{content_id}", content_id)
            .replace("{language}", language)
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: PlaceholderStrings = PlaceholderStrings {
    title: "Content not available",
    message: "This content ({content_id}) is not available in {language} yet. Please try again later.",
};

// ==================== Arabic Strings ====================

pub const ARABIC_STRINGS: PlaceholderStrings = PlaceholderStrings {
    title: "المحتوى غير متوفر",
    message: "هذا المحتوى ({content_id}) غير متوفر باللغة {language} حاليًا. يرجى المحاولة لاحقًا.",
};

// ==================== Hindi Strings ====================

pub const HINDI_STRINGS: PlaceholderStrings = PlaceholderStrings {
    title: "सामग्री उपलब्ध नहीं है",
    message: "यह सामग्री ({content_id}) अभी {language} में उपलब्ध नहीं है। कृपया बाद में पुनः प्रयास करें।",
};

// ==================== Urdu Strings ====================

pub const URDU_STRINGS: PlaceholderStrings = PlaceholderStrings {
    title: "مواد دستیاب نہیں ہے",
    message: "یہ مواد ({content_id}) ابھی {language} میں دستیاب نہیں ہے۔ براہ کرم بعد میں دوبارہ کوشش کریں۔",
};

// ==================== Malayalam Strings ====================

pub const MALAYALAM_STRINGS: PlaceholderStrings = PlaceholderStrings {
    title: "ഉള്ളടക്കം ലഭ്യമല്ല",
    message: "ഈ ഉള്ളടക്കം ({content_id}) ഇപ്പോൾ {language} ഭാഷയിൽ ലഭ്യമല്ല. ദയവായി പിന്നീട് വീണ്ടും ശ്രമിക്കുക.",
};

// ==================== Spanish Strings ====================

pub const SPANISH_STRINGS: PlaceholderStrings = PlaceholderStrings {
    title: "Contenido no disponible",
    message: "Este contenido ({content_id}) aún no está disponible en {language}. Por favor, inténtalo más tarde.",
};

// ==================== French Strings ====================

pub const FRENCH_STRINGS: PlaceholderStrings = PlaceholderStrings {
    title: "Contenu indisponible",
    message: "Ce contenu ({content_id}) n'est pas encore disponible en {language}. Veuillez réessayer plus tard.",
};
