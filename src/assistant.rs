//! Rule-based assistant persona ("川小农").
//!
//! A deterministic decision tree over case-sensitive substring matches. Rule
//! order and keyword order are part of the product contract: rival-school
//! jokes take priority over notice generation, which takes priority over the
//! school facts, and must not be reordered.

use chrono::{Datelike, Local, NaiveDate};

/// Display name the assistant answers under.
pub const ASSISTANT_NAME: &str = "川小农";

/// Rival institutions, checked in this order; the first one found is named
/// in the reply.
const RIVAL_SCHOOLS: &[&str] = &[
    "四川大学",
    "电子科大",
    "西南财大",
    "西南交大",
    "四川师大",
    "成都理工",
];

const NOTICE_KEYWORDS: &[&str] = &["通知", "公告", "发文"];

const SCHOOL_KEYWORDS: &[&str] = &["四川农业大学", "川农", "农大", "学校"];

const FALLBACK_REPLY: &str = "我是笨蛋我不知道。";

/// Answer a question addressed to the assistant. Pure but for the current
/// calendar date, which the notice template embeds.
pub fn respond(question: &str) -> String {
    respond_on(question, Local::now().date_naive())
}

fn respond_on(question: &str, today: NaiveDate) -> String {
    if let Some(school) = RIVAL_SCHOOLS.iter().find(|s| question.contains(*s)) {
        return format!("{school}有什么好问的？我们四川农业大学才是最棒的！😎");
    }

    if NOTICE_KEYWORDS.iter().any(|k| question.contains(k)) {
        let title = notice_subject(question).unwrap_or("重要事项");
        return format!(
            "关于{title}的通知\n\n全校师生：\n\n{title}是学校当前的重要工作，请全体师生高度重视，按照相关要求认真落实。\n\n特此通知。\n四川农业大学\n{}年{}月{}日",
            today.year(),
            today.month(),
            today.day()
        );
    }

    if SCHOOL_KEYWORDS.iter().any(|k| question.contains(k)) {
        return school_fact(question).to_string();
    }

    FALLBACK_REPLY.to_string()
}

/// Extract `<X>` from the first `关于<X>的通知` in the question, shortest
/// match first.
fn notice_subject(question: &str) -> Option<&str> {
    let start = question.find("关于")? + "关于".len();
    let rest = &question[start..];
    let end = rest.find("的通知")?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

fn school_fact(question: &str) -> &'static str {
    if question.contains("历史") {
        "四川农业大学始建于1906年，是国家“211工程”重点建设大学和国家“双一流”建设高校。"
    } else if question.contains("地址") || question.contains("位置") {
        "四川农业大学有三个校区：成都校区（成都市温江区惠民路211号）、雅安校区（雅安市雨城区新康路46号）、都江堰校区（成都市都江堰市建设路288号）。"
    } else if question.contains("专业") || question.contains("学科") {
        "四川农业大学拥有作物学、畜牧学、兽医学等国家重点学科，以及农学、动物科学、植物保护等优势专业。"
    } else if question.contains("校长") {
        "四川农业大学现任校长是吴德教授。"
    } else if question.contains("排名") {
        "四川农业大学在全国农林类高校中排名前列，是四川省重点建设的高水平大学。"
    } else {
        "四川农业大学是一所以生物科技为特色，农业科技为优势，多学科协调发展的国家“211工程”重点建设大学和国家“双一流”建设高校。"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_rival_school_is_named_in_the_taunt() {
        let reply = respond_on("四川大学怎么样", day());
        assert!(reply.contains("四川大学"));
        assert!(reply.contains("最棒"));
    }

    #[test]
    fn test_first_listed_rival_wins_when_several_appear() {
        let reply = respond_on("成都理工和电子科大哪个好", day());
        // 电子科大 comes first in the list, regardless of position in text
        assert!(reply.starts_with("电子科大"));
    }

    #[test]
    fn test_rival_rule_beats_school_keywords() {
        let reply = respond_on("四川大学和川农的排名", day());
        assert!(reply.contains("四川大学有什么好问的"));
    }

    #[test]
    fn test_notice_with_subject_embeds_subject_and_date() {
        let reply = respond_on("帮我写一个关于期末考试的通知", day());
        assert!(reply.starts_with("关于期末考试的通知"));
        assert!(reply.contains("期末考试是学校当前的重要工作"));
        assert!(reply.contains("2024年3月5日"));
    }

    #[test]
    fn test_notice_without_subject_uses_default() {
        let reply = respond_on("发个公告", day());
        assert!(reply.starts_with("关于重要事项的通知"));
    }

    #[test]
    fn test_notice_subject_is_shortest_match() {
        assert_eq!(
            notice_subject("关于放假的通知和关于开学的通知"),
            Some("放假")
        );
        assert_eq!(notice_subject("关于的通知"), None);
        assert_eq!(notice_subject("写个通知"), None);
    }

    #[test]
    fn test_school_president_fact() {
        let reply = respond_on("学校的校长是谁", day());
        assert!(reply.contains("吴德"));
    }

    #[test]
    fn test_school_history_fact() {
        let reply = respond_on("川农的历史", day());
        assert!(reply.contains("1906年"));
    }

    #[test]
    fn test_school_generic_sentence_when_no_topic_matches() {
        let reply = respond_on("介绍一下学校", day());
        assert!(reply.contains("生物科技为特色"));
    }

    #[test]
    fn test_fallback_for_everything_else() {
        assert_eq!(respond_on("今天天气怎么样", day()), FALLBACK_REPLY);
        assert_eq!(respond_on("", day()), FALLBACK_REPLY);
    }
}
