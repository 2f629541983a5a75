use crate::models::{ActivistExtraRow, ActivistLevel};

/// Resolves two versions of an activist record into one.
///
/// The result keeps the target's identity (id, name, hidden) untouched;
/// every mergeable attribute is resolved by one of three rules:
///
///   flag  - boolean OR, true wins from either side
///   opt   - target's value if present, otherwise the original's
///   level - the higher-ranked membership tier
///
/// `opt` favors the target, so merge(a, b) differs from merge(b, a);
/// callers must pass (loser, winner) consistently. Inputs are not
/// mutated. Attributes not listed below pass through from the target,
/// including the derived event aggregates.
pub fn merge(original: &ActivistExtraRow, target: &ActivistExtraRow) -> ActivistExtraRow {
    let mut merged = target.clone();

    let o = &original.membership;
    merged.membership.hiatus = merge_flag(o.hiatus, target.membership.hiatus);
    merged.membership.source = merge_opt(&o.source, &target.membership.source);
    merged.membership.activist_level =
        merge_level(&o.activist_level, &target.membership.activist_level);

    let o = &original.activist;
    let t = &target.activist;
    merged.activist.email = merge_opt(&o.email, &t.email);
    merged.activist.phone = merge_opt(&o.phone, &t.phone);
    merged.activist.facebook = merge_opt(&o.facebook, &t.facebook);
    merged.activist.location = merge_opt(&o.location, &t.location);
    merged.activist.dob = merge_opt(&o.dob, &t.dob);

    let o = &original.connection;
    let t = &target.connection;
    merged.connection.prospect_organizer = merge_flag(o.prospect_organizer, t.prospect_organizer);
    merged.connection.prospect_chapter_member =
        merge_flag(o.prospect_chapter_member, t.prospect_chapter_member);
    merged.connection.prospect_senior_organizer =
        merge_flag(o.prospect_senior_organizer, t.prospect_senior_organizer);
    merged.connection.circle_interest = merge_flag(o.circle_interest, t.circle_interest);
    merged.connection.mpi = merge_flag(o.mpi, t.mpi);

    merged.connection.connector = merge_opt(&o.connector, &t.connector);
    merged.connection.training0 = merge_opt(&o.training0, &t.training0);
    merged.connection.training1 = merge_opt(&o.training1, &t.training1);
    merged.connection.training2 = merge_opt(&o.training2, &t.training2);
    merged.connection.training3 = merge_opt(&o.training3, &t.training3);
    merged.connection.training4 = merge_opt(&o.training4, &t.training4);
    merged.connection.training5 = merge_opt(&o.training5, &t.training5);
    merged.connection.training6 = merge_opt(&o.training6, &t.training6);
    merged.connection.dev_application_date =
        merge_opt(&o.dev_application_date, &t.dev_application_date);
    merged.connection.dev_application_type =
        merge_opt(&o.dev_application_type, &t.dev_application_type);
    merged.connection.dev_quiz = merge_opt(&o.dev_quiz, &t.dev_quiz);
    merged.connection.dev_manager = merge_opt(&o.dev_manager, &t.dev_manager);
    merged.connection.dev_interest = merge_opt(&o.dev_interest, &t.dev_interest);
    merged.connection.cm_first_email = merge_opt(&o.cm_first_email, &t.cm_first_email);
    merged.connection.cm_approval_email = merge_opt(&o.cm_approval_email, &t.cm_approval_email);
    merged.connection.cm_warning_email = merge_opt(&o.cm_warning_email, &t.cm_warning_email);
    merged.connection.cir_first_email = merge_opt(&o.cir_first_email, &t.cir_first_email);
    merged.connection.referral_friends = merge_opt(&o.referral_friends, &t.referral_friends);
    merged.connection.referral_apply = merge_opt(&o.referral_apply, &t.referral_apply);
    merged.connection.referral_outlet = merge_opt(&o.referral_outlet, &t.referral_outlet);
    merged.connection.interest_date = merge_opt(&o.interest_date, &t.interest_date);
    merged.connection.survey_completion = merge_opt(&o.survey_completion, &t.survey_completion);
    merged.connection.notes = merge_opt(&o.notes, &t.notes);

    merged
}

fn merge_flag(original: bool, target: bool) -> bool {
    target || original
}

fn merge_opt<T: Clone>(original: &Option<T>, target: &Option<T>) -> Option<T> {
    if target.is_some() {
        target.clone()
    } else {
        original.clone()
    }
}

fn merge_level(original: &Option<String>, target: &Option<String>) -> Option<String> {
    match (original, target) {
        (Some(o), Some(t)) => {
            if ActivistLevel::rank_of(o) > ActivistLevel::rank_of(t) {
                Some(o.clone())
            } else {
                Some(t.clone())
            }
        }
        (Some(o), None) => Some(o.clone()),
        (None, _) => target.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivistExtraRow;

    fn record(id: i64, name: &str) -> ActivistExtraRow {
        let mut row = ActivistExtraRow::default();
        row.activist.id = id;
        row.activist.name = name.to_string();
        row
    }

    #[test]
    fn higher_level_wins_and_missing_email_backfills() {
        let mut original = record(1, "dupe");
        original.membership.activist_level = Some("Organizer".to_string());
        original.activist.email = None;

        let mut target = record(2, "kept");
        target.membership.activist_level = Some("Supporter".to_string());
        target.activist.email = Some("a@b.com".to_string());

        let merged = merge(&original, &target);
        assert_eq!(merged.membership.activist_level.as_deref(), Some("Organizer"));
        assert_eq!(merged.activist.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn boolean_flags_or_together() {
        let mut original = record(1, "dupe");
        original.connection.mpi = true;
        original.membership.hiatus = true;

        let mut target = record(2, "kept");
        target.connection.mpi = false;
        target.connection.prospect_organizer = true;

        let merged = merge(&original, &target);
        assert!(merged.connection.mpi);
        assert!(merged.membership.hiatus);
        assert!(merged.connection.prospect_organizer);
    }

    #[test]
    fn target_value_wins_when_both_present() {
        let mut original = record(1, "dupe");
        original.activist.phone = Some("111".to_string());
        original.connection.notes = Some("old notes".to_string());

        let mut target = record(2, "kept");
        target.activist.phone = Some("222".to_string());
        target.connection.notes = Some("new notes".to_string());

        let merged = merge(&original, &target);
        assert_eq!(merged.activist.phone.as_deref(), Some("222"));
        assert_eq!(merged.connection.notes.as_deref(), Some("new notes"));
    }

    #[test]
    fn level_from_original_when_target_has_none() {
        let mut original = record(1, "dupe");
        original.membership.activist_level = Some("Chapter Member".to_string());

        let target = record(2, "kept");
        let merged = merge(&original, &target);
        assert_eq!(
            merged.membership.activist_level.as_deref(),
            Some("Chapter Member")
        );
    }

    #[test]
    fn identity_comes_from_target_and_inputs_are_untouched() {
        let mut original = record(1, "dupe");
        original.activist.email = Some("dupe@x.org".to_string());
        let target = record(2, "kept");

        let before = original.clone();
        let merged = merge(&original, &target);

        assert_eq!(merged.activist.id, 2);
        assert_eq!(merged.activist.name, "kept");
        assert_eq!(original.activist.email, before.activist.email);
    }

    #[test]
    fn not_commutative_for_present_text() {
        let mut a = record(1, "a");
        a.activist.location = Some("Oakland".to_string());
        let mut b = record(2, "b");
        b.activist.location = Some("Berkeley".to_string());

        assert_eq!(merge(&a, &b).activist.location.as_deref(), Some("Berkeley"));
        assert_eq!(merge(&b, &a).activist.location.as_deref(), Some("Oakland"));
    }
}
