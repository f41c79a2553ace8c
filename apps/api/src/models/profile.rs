use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// The two locales the portfolio is published in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Name used when instructing the model which language to answer in.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "Arabic",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language code '{0}' (expected 'en' or 'ar')")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub role: String,
    /// Free text, e.g. "Sep 2012 - Present". Never parsed.
    pub period: String,
    pub description: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub category: String,
}

/// Résumé content for a single language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub avatar_url: String,
    pub skills: Vec<SkillCategory>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub certificates: Vec<Certificate>,
    pub blog: Vec<BlogPost>,
}

impl ProfileData {
    /// Experience entries carrying `tag`, in their original order.
    pub fn experience_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Experience> {
        self.experience
            .iter()
            .filter(move |e| e.tags.iter().any(|t| t == tag))
    }

    /// Every tag used across experience entries, first occurrence order.
    pub fn experience_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for tag in self.experience.iter().flat_map(|e| e.tags.iter()) {
            if !tags.contains(&tag.as_str()) {
                tags.push(tag);
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socials {
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

/// The complete profile snapshot: contact details plus one `ProfileData` per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalData {
    pub email: String,
    pub cv_url: String,
    pub socials: Socials,
    #[serde(deserialize_with = "known_locales")]
    pub content: BTreeMap<Language, ProfileData>,
}

/// Keeps the locales we publish and ignores any other keys the CMS carries.
fn known_locales<'de, D>(deserializer: D) -> Result<BTreeMap<Language, ProfileData>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut content = BTreeMap::new();
    for (code, value) in raw {
        let Ok(language) = code.parse::<Language>() else {
            continue;
        };
        let profile = serde_json::from_value(value).map_err(de::Error::custom)?;
        content.insert(language, profile);
    }
    Ok(content)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("profile snapshot has no content for language '{0}'")]
    MissingLocale(Language),
}

impl GlobalData {
    pub fn profile(&self, language: Language) -> Option<&ProfileData> {
        self.content.get(&language)
    }

    /// Every supported language must be present; a partial snapshot is rejected outright.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        match Language::ALL
            .into_iter()
            .find(|lang| !self.content.contains_key(lang))
        {
            Some(missing) => Err(SnapshotError::MissingLocale(missing)),
            None => Ok(()),
        }
    }
}
