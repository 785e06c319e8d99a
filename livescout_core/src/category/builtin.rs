use super::CategoryRule;
use once_cell::sync::Lazy;

/// Category that ranks first when no configuration overrides it.
pub const DEFAULT_CATEGORY_ID: &str = "bj";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Rules shipped with livescout.
static BUILTIN_RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        CategoryRule {
            id: DEFAULT_CATEGORY_ID.to_string(),
            name: "BJ 방송".to_string(),
            description: Some("Personal broadcaster streams (SOOP/AfreecaTV style)".to_string()),
            include: strings(&[r"\bBJ\b", "비제이", "엑셀", "숲\\s*방송", "아프리카", "합방", "소통"]),
            exclude: strings(&["다시보기", "하이라이트", "편집본"]),
            priority: 12,
            enabled: true,
            search_terms: strings(&["BJ 라이브", "엑셀 방송"]),
        },
        CategoryRule {
            id: "game".to_string(),
            name: "게임".to_string(),
            description: Some("Game streams".to_string()),
            include: strings(&[
                "게임",
                "롤",
                "리그\\s*오브\\s*레전드",
                "배그",
                "발로란트",
                "메이플",
                "minecraft|마인크래프트",
                r"\bLoL\b",
            ]),
            exclude: strings(&["게임\\s*뉴스"]),
            priority: 10,
            enabled: true,
            search_terms: Vec::new(),
        },
        CategoryRule {
            id: "music".to_string(),
            name: "노래".to_string(),
            description: Some("Singing and music streams".to_string()),
            include: strings(&["노래", "버스킹", "라이브\\s*공연", r"\bcover\b", "음악"]),
            exclude: strings(&["뮤직\\s*뱅크"]),
            priority: 9,
            enabled: true,
            search_terms: Vec::new(),
        },
        CategoryRule {
            id: "mukbang".to_string(),
            name: "먹방".to_string(),
            description: Some("Eating broadcasts".to_string()),
            include: strings(&["먹방", "mukbang", "asmr\\s*먹"]),
            exclude: Vec::new(),
            priority: 9,
            enabled: true,
            search_terms: Vec::new(),
        },
        CategoryRule {
            id: "talk".to_string(),
            name: "토크".to_string(),
            description: Some("Just chatting".to_string()),
            include: strings(&["토크", "잡담", "수다", "Q&A"]),
            exclude: Vec::new(),
            priority: 8,
            enabled: true,
            search_terms: Vec::new(),
        },
    ]
});

/// Built-in rules, in priority order.
pub fn builtin_rules() -> &'static [CategoryRule] {
    &BUILTIN_RULES
}
