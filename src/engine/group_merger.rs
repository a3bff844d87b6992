// ==========================================
// 课表日历导出系统 - 分组合并器
// ==========================================
// 职责: 同一物理课程在两个分组子列各出现一次时,融合为一个课程
// 身份键: (标题, 开始, 结束, 时段行, 日锚列)
// ==========================================
// 红线: 不丢弃任何参与候选的教师 / 描述 / 分组信息
// 红线: 输出顺序 = 身份键首次出现顺序（相同输入结果可复现）
// ==========================================

use crate::domain::session::{MergedSession, SessionCandidate, SessionKey};
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

pub struct GroupMerger;

impl GroupMerger {
    /// 按身份键融合候选
    pub fn merge(candidates: Vec<SessionCandidate>) -> Vec<MergedSession> {
        let candidate_count = candidates.len();
        let mut merged: IndexMap<SessionKey, MergedSession> = IndexMap::new();

        for candidate in candidates {
            match merged.entry(candidate.key()) {
                Entry::Vacant(slot) => {
                    slot.insert(MergedSession::from(candidate));
                }
                Entry::Occupied(mut slot) => {
                    let session = slot.get_mut();
                    session.teachers.extend(candidate.teachers);
                    session
                        .description_fragments
                        .extend(candidate.description_fragments);
                    session.group_labels.extend(candidate.group_labels);
                    if !session.origin_columns.contains(&candidate.origin_column) {
                        session.origin_columns.push(candidate.origin_column);
                    }
                }
            }
        }

        debug!(
            candidates = candidate_count,
            merged = merged.len(),
            "分组合并完成"
        );
        merged.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::SessionInstant;
    use crate::domain::types::GroupLabel;
    use chrono::NaiveDate;
    use indexmap::IndexSet;

    fn candidate(title: &str, column: usize, start_h: u32, teacher: &str, group: &str) -> SessionCandidate {
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        SessionCandidate {
            title: title.to_string(),
            teachers: [teacher.to_string()].into_iter().collect(),
            description_fragments: IndexSet::new(),
            start: SessionInstant::local(day.and_hms_opt(start_h, 0, 0).unwrap()),
            end: SessionInstant::local(day.and_hms_opt(start_h + 2, 0, 0).unwrap()),
            group_labels: GroupLabel::normalize(group).into_iter().collect(),
            origin_row: 3,
            origin_day_anchor: 2,
            origin_column: column,
        }
    }

    #[test]
    fn test_same_key_merges_groups_and_teachers() {
        let mut a = candidate("Math", 2, 8, "Dupont", "G 1");
        a.description_fragments.insert("Amphi".to_string());
        let mut b = candidate("Math", 3, 8, "Martin", "G 2");
        b.description_fragments.insert("Salle 12".to_string());
        b.description_fragments.insert("Amphi".to_string());

        let merged = GroupMerger::merge(vec![a, b]);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        let groups: Vec<String> = m.group_labels.iter().map(ToString::to_string).collect();
        assert_eq!(groups, vec!["G 1", "G 2"]);
        assert_eq!(m.teachers.len(), 2);
        assert_eq!(m.description_fragments.len(), 2);
        assert_eq!(m.origin_columns, vec![2, 3]);
    }

    #[test]
    fn test_different_times_stay_separate() {
        let merged = GroupMerger::merge(vec![
            candidate("Math", 2, 8, "Dupont", "G 1"),
            candidate("Math", 3, 10, "Dupont", "G 2"),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_different_titles_stay_separate_in_first_seen_order() {
        let merged = GroupMerger::merge(vec![
            candidate("Physique", 2, 8, "Curie", "G 1"),
            candidate("Anglais", 3, 8, "Smith", "G 2"),
            candidate("Physique", 3, 8, "Curie", "G 2"),
        ]);
        let titles: Vec<&str> = merged.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Physique", "Anglais"]);
        assert_eq!(merged[0].group_labels.len(), 2);
    }

    #[test]
    fn test_duplicate_teacher_not_repeated() {
        let merged = GroupMerger::merge(vec![
            candidate("Math", 2, 8, "Dupont", "G 1"),
            candidate("Math", 3, 8, "Dupont", "G 2"),
        ]);
        assert_eq!(merged[0].teachers.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(GroupMerger::merge(Vec::new()).is_empty());
    }
}
