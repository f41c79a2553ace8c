//! System context assembly and the canned replies the gateway falls back to.

use serde_json::json;

use crate::models::profile::{Language, ProfileData};

/// Builds the system instruction for one language from that language's profile.
pub fn build_system_context(profile: &ProfileData, contact_email: &str, language: Language) -> String {
    let experience = json!(profile
        .experience
        .iter()
        .map(|e| json!({ "role": e.role, "company": e.company }))
        .collect::<Vec<_>>());
    let skills = json!(profile.skills);

    format!(
        "You are an AI Professional Assistant for {name}.\n\
         {name} is a highly skilled {title}.\n\
         \n\
         Resume data:\n\
         Bio: {bio}\n\
         Location: {location}\n\
         Experience: {experience}\n\
         Skills: {skills}\n\
         \n\
         Rules:\n\
         - Reply in {reply_language}.\n\
         - Keep responses concise and professional.\n\
         - If you don't know an answer, suggest emailing {name} at {contact_email}.",
        name = profile.name,
        title = profile.title,
        bio = profile.bio,
        location = profile.location,
        reply_language = language.display_name(),
    )
}

/// Reply when no API credential is provisioned.
pub fn offline_message(language: Language) -> &'static str {
    match language {
        Language::En => "I'm currently in 'Offline Mode'. To enable my AI capabilities on a public host, an API gateway is required. You can still reach out directly via the contact section!",
        Language::Ar => "أنا حالياً في 'وضع عدم الاتصال'. لتفعيل قدرات الذكاء الاصطناعي على استضافة عامة، يلزم وجود بوابة برمجية. يمكنك التواصل مباشرة عبر قسم الاتصال!",
    }
}

/// Reply when the generation service rate-limits us.
pub fn busy_message(language: Language) -> &'static str {
    match language {
        Language::En => "System busy. Please try again in a moment.",
        Language::Ar => "النظام مشغول. يرجى المحاولة مرة أخرى بعد قليل.",
    }
}

/// Reply for every other failure; points the visitor at the contact address.
pub fn error_message(language: Language, contact_email: &str) -> String {
    match language {
        Language::En => format!(
            "I encountered a processing error. Let's try another question, or email {contact_email} directly."
        ),
        Language::Ar => format!(
            "واجهت خطأ في المعالجة. دعنا نجرب سؤالاً آخر، أو راسلنا مباشرة على {contact_email}."
        ),
    }
}
