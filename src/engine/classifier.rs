// ==========================================
// 包装车间产能看板 - 规格码分类器
// ==========================================
// 规则（按优先级）:
// 1) 包含 giro / fox / vex（大小写不敏感）→ 对应网袋线
// 2) 线别后缀: 末尾单独的 G/F/V 字母
//    - TWB 开头的散装箱: "TWB...G"
//    - 袋数/尺码规格: "10-4G"、"150/4 V"
// 3) 其余（含空值）→ Bulk
// 单字母包含匹配（任何含 G/F/V 的规格）不采用
// ==========================================

use crate::domain::types::Category;
use crate::engine::extractor::extract_count_size;

// ==========================================
// StyleClassifier - 规格码分类器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleClassifier;

impl StyleClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 规格码 → 包装类别（全函数，永不失败）
    pub fn classify(&self, style_code: Option<&str>) -> Category {
        classify_style(style_code)
    }
}

/// 规格码 → 包装类别
pub fn classify_style(style_code: Option<&str>) -> Category {
    let Some(code) = style_code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Category::Bulk;
    };

    let lower = code.to_lowercase();
    if lower.contains("giro") {
        return Category::Giro;
    }
    if lower.contains("fox") {
        return Category::Fox;
    }
    if lower.contains("vex") {
        return Category::Vex;
    }

    line_suffix_category(code).unwrap_or(Category::Bulk)
}

/// 线别后缀字母
fn suffix_letter_category(letter: char) -> Option<Category> {
    match letter.to_ascii_uppercase() {
        'G' => Some(Category::Giro),
        'F' => Some(Category::Fox),
        'V' => Some(Category::Vex),
        _ => None,
    }
}

/// 按末尾线别字母分类
fn line_suffix_category(code: &str) -> Option<Category> {
    let mut chars = code.chars().rev();
    let category = suffix_letter_category(chars.next()?)?;

    if code.to_uppercase().starts_with("TWB") {
        return Some(category);
    }

    // 袋数/尺码规格: 后缀字母必须独立（前一个字符不是字母），避免 "BAG" 之类误判
    let standalone = chars.next().map(|c| !c.is_alphabetic()).unwrap_or(false);
    if standalone && extract_count_size(Some(code)).is_some() {
        return Some(category);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_tokens_case_insensitive() {
        assert_eq!(classify_style(Some("GIRO 10-4")), Category::Giro);
        assert_eq!(classify_style(Some("giro")), Category::Giro);
        assert_eq!(classify_style(Some("Fox 8-5")), Category::Fox);
        assert_eq!(classify_style(Some("VEXAR 15-2")), Category::Vex);
    }

    #[test]
    fn test_priority_giro_before_fox_before_vex() {
        assert_eq!(classify_style(Some("FOX/GIRO")), Category::Giro);
        assert_eq!(classify_style(Some("VEX-FOX")), Category::Fox);
    }

    #[test]
    fn test_empty_and_null_are_bulk() {
        assert_eq!(classify_style(None), Category::Bulk);
        assert_eq!(classify_style(Some("")), Category::Bulk);
        assert_eq!(classify_style(Some("   ")), Category::Bulk);
    }

    #[test]
    fn test_tri_wall_suffix() {
        assert_eq!(classify_style(Some("TWB-G")), Category::Giro);
        assert_eq!(classify_style(Some("twb 18-2f")), Category::Fox);
        assert_eq!(classify_style(Some("TWBV")), Category::Vex);
        assert_eq!(classify_style(Some("TWB")), Category::Bulk);
        assert_eq!(classify_style(Some("TWB-X")), Category::Bulk);
    }

    #[test]
    fn test_count_size_suffix() {
        assert_eq!(classify_style(Some("10-4G")), Category::Giro);
        assert_eq!(classify_style(Some("150/4 V")), Category::Vex);
        assert_eq!(classify_style(Some("8-5F")), Category::Fox);
    }

    #[test]
    fn test_single_letter_containment_is_not_a_match() {
        assert_eq!(classify_style(Some("BULK-A")), Category::Bulk);
        assert_eq!(classify_style(Some("5# CARTON")), Category::Bulk);
        assert_eq!(classify_style(Some("25/2 BAG")), Category::Bulk);
        assert_eq!(classify_style(Some("GRAPEFRUIT")), Category::Bulk);
        assert_eq!(classify_style(Some("RPC 6411")), Category::Bulk);
    }

    #[test]
    fn test_classifier_struct_delegates() {
        let classifier = StyleClassifier::new();
        assert_eq!(classifier.classify(Some("giro")), Category::Giro);
    }
}
