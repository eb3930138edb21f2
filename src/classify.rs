//! Keyword classification of listing titles.
//!
//! Tables are ordered: the first category with a keyword contained in the
//! title (case-insensitively) wins, so reordering a table changes results.

#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered category → keywords table with a default for unmatched titles.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    entries: Vec<CategoryEntry>,
    default: String,
}

impl CategoryMap {
    pub fn new(default: &str, table: &[(&str, &[&str])]) -> Self {
        let entries = table
            .iter()
            .map(|(name, keywords)| CategoryEntry {
                name: name.to_string(),
                // Lowercased once here instead of on every lookup
                keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self {
            entries,
            default: default.to_string(),
        }
    }

    pub fn default_category(&self) -> &str {
        &self.default
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// First category with a keyword contained in `title`.
    pub fn find_match(&self, title: &str) -> Option<&str> {
        let title = title.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.keywords.iter().any(|kw| title.contains(kw.as_str())))
            .map(|entry| entry.name.as_str())
    }

    /// Fixed category if configured, else first keyword match, else default.
    pub fn classify(&self, title: &str, fixed_category: Option<&str>) -> String {
        if let Some(fixed) = fixed_category.filter(|f| !f.trim().is_empty()) {
            return fixed.to_string();
        }
        self.find_match(title)
            .unwrap_or(&self.default)
            .to_string()
    }
}

/// Classification for news articles.
///
/// The override table is consulted before the per-source fixed category;
/// the priority flag is independent of the category.
#[derive(Debug, Clone)]
pub struct NewsClassifier {
    overrides: CategoryMap,
    base: CategoryMap,
    priority_keywords: Vec<String>,
}

impl NewsClassifier {
    pub fn new(overrides: CategoryMap, base: CategoryMap, priority_keywords: &[&str]) -> Self {
        Self {
            overrides,
            base,
            priority_keywords: priority_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn classify(&self, title: &str, fixed_category: Option<&str>) -> String {
        match self.overrides.find_match(title) {
            Some(category) => category.to_string(),
            None => self.base.classify(title, fixed_category),
        }
    }

    pub fn is_priority(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.priority_keywords.iter().any(|kw| title.contains(kw.as_str()))
    }
}

pub const JOBS_DEFAULT_CATEGORY: &str = "Geral";
pub const NEWS_DEFAULT_CATEGORY: &str = "Utilidade";

const JOB_TABLE: &[(&str, &[&str])] = &[
    (
        "Tecnologia",
        &[
            "IT", "TI", "Informática", "Developer", "Desenvolvedor", "Programador", "Software",
            "Sistemas", "Redes", "Cibersegurança", "Data", "Python", "Java", "Frontend",
            "Backend", "Fullstack", "DevOps", "Cloud", "Suporte Técnico",
        ],
    ),
    (
        "Gestão",
        &[
            "Gerente", "Gestor", "Director", "Diretor", "Manager", "Supervisor", "Coordenador",
            "Coordenação", "CEO", "CFO", "COO", "Chefe", "Responsável",
        ],
    ),
    (
        "Finanças",
        &[
            "Contabilista", "Contabilidade", "Financeiro", "Finanças", "Auditor", "Auditoria",
            "Tesoureiro", "Economista", "Análise Financeira", "Fiscal",
        ],
    ),
    (
        "Saúde",
        &[
            "Médico", "Enfermeiro", "Enfermeira", "Farmacêutico", "Técnico de Saúde", "Saúde",
            "Clínica", "Hospital", "Dentista", "Fisioterapeuta",
        ],
    ),
    (
        "Engenharia",
        &[
            "Engenheiro", "Engenharia", "Civil", "Mecânico", "Elétrico", "Topógrafo",
            "Construção", "Estrutural", "Petróleo", "Petroquímica", "Minas",
        ],
    ),
    (
        "Educação",
        &[
            "Professor", "Professora", "Docente", "Educador", "Formador", "Tutor", "Ensino",
            "Escola", "Universidade", "Docência",
        ],
    ),
    (
        "Logística",
        &[
            "Motorista", "Logística", "Armazém", "Transporte", "Estoca", "Distribuição",
            "Supply Chain", "Compras", "Procurement", "Frota",
        ],
    ),
    (
        "Limpeza & Serviços",
        &[
            "Limpeza", "Higiene", "Lavandaria", "Copeiro", "Cozinheiro", "Segurança", "Porteiro",
            "Recepcionista", "Assistente",
        ],
    ),
    (
        "Vendas & Marketing",
        &[
            "Vendedor", "Vendas", "Comercial", "Marketing", "Publicidade", "Relações Públicas",
            "Social Media", "E-commerce", "Representante Comercial",
        ],
    ),
    (
        "Concurso Público",
        &[
            "Concurso", "Estado", "Governo", "Ministério", "INEFOP", "Público", "Municipal",
            "Provincial", "Administração Pública",
        ],
    ),
];

const NEWS_TABLE: &[(&str, &[&str])] = &[
    ("Economia", &["Kwanza", "BNA", "Câmbio", "Inflação", "Bancos", "Petróleo", "PIB", "FMI"]),
    (
        "Oportunidades",
        &["Concurso", "Vagas", "Admissão", "Investimento", "Empresa", "Negócios"],
    ),
    (
        "Utilidade",
        &["Gasolina", "Gasóleo", "BI", "Passaporte", "Taxas", "Saúde", "Educação", "Trânsito"],
    ),
];

const NEWS_OVERRIDE_TABLE: &[(&str, &[&str])] = &[
    (
        "Oportunidades",
        &["Concurso Público", "Vagas", "Recrutamento", "Bolsa de Estudo", "Bolsas de Estudo", "Emprego"],
    ),
    ("Economia", &["Kwanza", "BNA", "Câmbio", "Inflação", "FMI"]),
    (
        "Cultura",
        &["Cultura", "Música", "Festival", "Carnaval", "Kizomba", "Semba", "Kuduro", "Cinema"],
    ),
];

const PRIORITY_KEYWORDS: &[&str] = &[
    "Urgente",
    "Última Hora",
    "Alerta",
    "Aviso",
    "Greve",
    "Aumento",
    "Subida",
    "Escassez",
    "Corte de Energia",
    "Falta de Água",
];

const PLACEHOLDERS: &[(&str, &str)] = &[
    ("Tecnologia", "https://img.icons8.com/color/144/code.png"),
    ("Gestão", "https://img.icons8.com/color/144/manager.png"),
    ("Finanças", "https://img.icons8.com/color/144/money-bag-lira.png"),
    ("Saúde", "https://img.icons8.com/color/144/hospital.png"),
    ("Engenharia", "https://img.icons8.com/color/144/engineering.png"),
    ("Vendas & Marketing", "https://img.icons8.com/color/144/megaphone.png"),
    ("Economia", "https://img.icons8.com/color/144/economic-improvement.png"),
    ("Oportunidades", "https://img.icons8.com/color/144/briefcase.png"),
    ("Cultura", "https://img.icons8.com/color/144/theatre-mask.png"),
    ("Geral", "https://img.icons8.com/color/144/company.png"),
];

/// Job category table.
pub fn job_categories() -> CategoryMap {
    CategoryMap::new(JOBS_DEFAULT_CATEGORY, JOB_TABLE)
}

/// News classifier with override table and urgency terms.
pub fn news_classifier() -> NewsClassifier {
    NewsClassifier::new(
        CategoryMap::new(NEWS_DEFAULT_CATEGORY, NEWS_OVERRIDE_TABLE),
        CategoryMap::new(NEWS_DEFAULT_CATEGORY, NEWS_TABLE),
        PRIORITY_KEYWORDS,
    )
}

/// Static image used when no picture could be extracted for a category.
pub fn placeholder_for(category: &str) -> &'static str {
    PLACEHOLDERS
        .iter()
        .find(|(name, _)| *name == category)
        .or_else(|| PLACEHOLDERS.iter().find(|(name, _)| *name == JOBS_DEFAULT_CATEGORY))
        .map(|(_, url)| *url)
        .unwrap_or("https://img.icons8.com/color/144/company.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins_in_table_order() {
        let map = job_categories();
        // "Gerente" (Gestão) precedes "Vendas" (Vendas & Marketing)
        assert_eq!(map.classify("Gerente de Vendas", None), "Gestão");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let map = job_categories();
        assert_eq!(map.classify("ENGENHEIRO CIVIL", None), "Engenharia");
        assert_eq!(map.classify("enfermeira chefe", None).as_str(), "Gestão");
    }

    #[test]
    fn test_unmatched_title_gets_default() {
        let map = job_categories();
        assert_eq!(map.classify("Pasteleiro", None), JOBS_DEFAULT_CATEGORY);
    }

    #[test]
    fn test_fixed_category_bypasses_keywords() {
        let map = job_categories();
        assert_eq!(
            map.classify("Engenheiro Informático", Some("Concurso Público")),
            "Concurso Público"
        );
        // Blank fixed category is treated as absent
        assert_eq!(map.classify("Engenheiro", Some("  ")), "Engenharia");
    }

    #[test]
    fn test_table_order_is_preserved() {
        let map = job_categories();
        let names: Vec<&str> = map.categories().collect();
        assert_eq!(names.first(), Some(&"Tecnologia"));
        assert_eq!(names.last(), Some(&"Concurso Público"));
    }

    #[test]
    fn test_news_override_beats_fixed_category() {
        let news = news_classifier();
        assert_eq!(
            news.classify("Governo abre recrutamento para professores", Some("Concurso Público")),
            "Oportunidades"
        );
        assert_eq!(
            news.classify("Ministro visita Malanje", Some("Concurso Público")),
            "Concurso Público"
        );
        assert_eq!(news.classify("Festival de Kizomba em Luanda", None), "Cultura");
    }

    #[test]
    fn test_news_default_and_base_table() {
        let news = news_classifier();
        assert_eq!(news.classify("Novos bancos abrem agências", None), "Economia");
        assert_eq!(news.classify("Chuvas em Benguela", None), NEWS_DEFAULT_CATEGORY);
    }

    #[test]
    fn test_priority_flag_is_independent() {
        let news = news_classifier();
        assert!(news.is_priority("ÚLTIMA HORA: greve nos transportes"));
        assert!(!news.is_priority("Festival de Kizomba em Luanda"));
    }

    #[test]
    fn test_placeholder_falls_back_to_general() {
        assert_eq!(placeholder_for("Engenharia"), "https://img.icons8.com/color/144/engineering.png");
        assert_eq!(placeholder_for("Logística"), placeholder_for("Geral"));
    }
}
