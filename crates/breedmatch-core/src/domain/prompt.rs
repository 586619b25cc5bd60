//! Instruction text sent alongside the image.

/// Marker replaced by the caller-supplied breed slug catalog.
pub const SLUG_LIST_PLACEHOLDER: &str = "{slug_list}";

/// Built-in instruction template.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"Tu es un expert canin humoristique français. Analyse cette photo d'une personne et détermine à quelle race de chien elle ressemble le plus.

Voici la liste EXACTE des slugs de races disponibles : {slug_list}

Réponds UNIQUEMENT en JSON valide, sans markdown, sans backticks, sans texte avant ou après :
{
  "breed_slug": "slug-exact-de-la-liste-ci-dessus",
  "match_percentage": 82,
  "reason": "Explication drôle et bienveillante en 2-3 phrases",
  "traits_communs": ["Trait 1", "Trait 2", "Trait 3"],
  "morphologie": "Résumé facultatif des traits physiques rapprochés (forme du visage, cheveux, regard)"
}

Règles :
- Sois toujours positif, drôle et bienveillant, jamais moqueur
- Le breed_slug DOIT correspondre EXACTEMENT à un slug de la liste
- Le pourcentage doit être entre 75 et 95 (toujours flatteur)
- Les traits communs doivent être des qualités positives (3 à 5 traits)
- Le champ morphologie est facultatif, omets-le si la photo ne permet pas de le remplir
- L'explication doit être personnalisée basée sur l'apparence physique de la personne
- Utilise un ton fun, comme si un expert canin faisait une blague bienveillante
- Si la photo ne montre pas clairement un visage humain, utilise le slug "golden-retriever" et adapte la raison"#;

/// Prompt construction strategy, parameterized by the breed catalog text.
///
/// A single template covers both the bare slug list and richer catalogs
/// (e.g. slugs annotated with their category); only the text passed to
/// [`PromptTemplate::render`] changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Returns `None` if the template has no `{slug_list}` marker.
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        template
            .contains(SLUG_LIST_PLACEHOLDER)
            .then_some(Self { template })
    }

    pub fn render(&self, slug_list: &str) -> String {
        self.template.replace(SLUG_LIST_PLACEHOLDER, slug_list)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}
