//! Tech-stack logo resolution.
//!
//! Maps free-form tech names onto devicon CDN icons, falling back to a
//! bundled default icon when the CDN has no icon for the name.

use reqwest::Client;

const TECH_ICON_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon/icons";
const DEFAULT_ICON: &str = "/tech.svg";

/// Alias table from normalized tech names to devicon identifiers.
const TECH_MAPPINGS: &[(&str, &str)] = &[
    ("angular", "angularjs"),
    ("aws", "amazonwebservices"),
    ("docker", "docker"),
    ("express", "express"),
    ("expressjs", "express"),
    ("go", "go"),
    ("golang", "go"),
    ("java", "java"),
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("k8s", "kubernetes"),
    ("kubernetes", "kubernetes"),
    ("mongo", "mongodb"),
    ("mongodb", "mongodb"),
    ("mysql", "mysql"),
    ("next", "nextjs"),
    ("nextjs", "nextjs"),
    ("node", "nodejs"),
    ("nodejs", "nodejs"),
    ("postgres", "postgresql"),
    ("postgresql", "postgresql"),
    ("python", "python"),
    ("react", "react"),
    ("reactjs", "react"),
    ("redis", "redis"),
    ("rust", "rust"),
    ("tailwind", "tailwindcss"),
    ("tailwindcss", "tailwindcss"),
    ("ts", "typescript"),
    ("typescript", "typescript"),
    ("vue", "vuejs"),
    ("vuejs", "vuejs"),
];

/// A resolved logo for one tech name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechLogo {
    pub tech: String,
    pub url: String,
}

/// Normalizes a tech name and resolves it through the alias table.
///
/// Lowercases, strips a `.js` suffix and any whitespace before lookup.
pub fn normalize_tech_name(tech: &str) -> Option<&'static str> {
    let lowered = tech.to_lowercase();
    let stripped = lowered.strip_suffix(".js").unwrap_or(&lowered);
    let key: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();

    TECH_MAPPINGS
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, icon)| *icon)
}

/// Resolves logo URLs for a tech stack, HEAD-checking each icon on the CDN.
///
/// A network failure during the check counts as a missing icon.
pub async fn get_tech_logos(client: &Client, techs: &[String]) -> Vec<TechLogo> {
    let mut logos = Vec::with_capacity(techs.len());

    for tech in techs {
        let url = match normalize_tech_name(tech) {
            Some(icon) => {
                let candidate = format!("{TECH_ICON_BASE_URL}/{icon}/{icon}-original.svg");
                if icon_exists(client, &candidate).await {
                    candidate
                } else {
                    DEFAULT_ICON.to_string()
                }
            }
            None => DEFAULT_ICON.to_string(),
        };
        logos.push(TechLogo {
            tech: tech.clone(),
            url,
        });
    }

    logos
}

async fn icon_exists(client: &Client, url: &str) -> bool {
    match client.head(url).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}
