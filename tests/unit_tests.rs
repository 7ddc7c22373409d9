// Unit tests for ScholarMatch

use chrono::NaiveDate;
use scholar_match::core::{
    calculate_match_score, check_hard_filters,
    deadline::{days_until_deadline, urgency_for},
    normalize_profile, normalize_records,
    region::canonical_state,
    HardFilterReason, Matcher,
};
use scholar_match::models::{
    Factor, ProfileForm, Scholarship, ScholarshipRecord, ScoringModel, StudentProfile, Urgency,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
}

fn create_test_form() -> ProfileForm {
    ProfileForm {
        name: Some("Test Student".to_string()),
        email: Some("student@example.com".to_string()),
        gpa: Some(3.8),
        grade_level: Some("College Sophomore".to_string()),
        major: Some("Computer Science".to_string()),
        state: Some("CA".to_string()),
        interests: vec!["coding".to_string(), "robotics".to_string()],
        ..ProfileForm::default()
    }
}

fn create_test_profile() -> StudentProfile {
    normalize_profile(&create_test_form()).unwrap()
}

fn create_test_record(id: &str) -> ScholarshipRecord {
    ScholarshipRecord {
        id: Some(id.to_string()),
        title: Some(format!("Scholarship {}", id)),
        min_gpa: Some(3.0),
        allowed_grade_levels: vec!["College Sophomore".to_string()],
        states: vec!["All".to_string()],
        major_tags: vec!["Computer Science".to_string(), "Engineering".to_string()],
        interest_tags: vec!["coding".to_string()],
        award_amount: Some(serde_json::json!(2000)),
        deadline: Some("2026-11-15".to_string()),
        category: Some("STEM".to_string()),
        ..ScholarshipRecord::default()
    }
}

fn create_test_scholarship(id: &str) -> Scholarship {
    let mut catalog = normalize_records(&[create_test_record(id)]);
    catalog.scholarships.remove(0)
}

#[test]
fn test_full_match_scores_100() {
    let profile = create_test_profile();
    let scholarship = create_test_scholarship("cs");

    assert!(check_hard_filters(&profile, &scholarship).is_ok());

    let card = calculate_match_score(&profile, &scholarship, &ScoringModel::default());
    assert_eq!(card.match_score, 100);
    for factor in Factor::ALL {
        assert_eq!(card.breakdown[&factor], 1.0, "{} should be fully met", factor);
    }
    assert_eq!(card.shared_interests, vec!["coding".to_string()]);
}

#[test]
fn test_state_outside_list_is_excluded() {
    let profile = normalize_profile(&ProfileForm {
        state: Some("TX".to_string()),
        ..create_test_form()
    })
    .unwrap();

    let mut record = create_test_record("ca-only");
    record.states = vec!["CA".to_string()];
    let catalog = normalize_records(&[record]);

    assert!(matches!(
        check_hard_filters(&profile, &catalog.scholarships[0]),
        Err(HardFilterReason::Location { .. })
    ));

    let outcome = Matcher::default().find_matches(&profile, &catalog.scholarships, today());
    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.hard_failures.len(), 1);
    assert_eq!(outcome.hard_failures[0].scholarship_id, "ca-only");
}

#[test]
fn test_unmatched_major_scores_75() {
    let profile = normalize_profile(&ProfileForm {
        major: Some("Art History".to_string()),
        ..create_test_form()
    })
    .unwrap();
    let scholarship = create_test_scholarship("cs");

    let card = calculate_match_score(&profile, &scholarship, &ScoringModel::default());
    assert_eq!(card.breakdown[&Factor::Major], 0.0);
    assert_eq!(card.match_score, 75);

    let catalog = vec![scholarship];
    let outcome = Matcher::default().find_matches(&profile, &catalog, today());
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].match_score, 75);
}

#[test]
fn test_state_names_and_codes_are_equivalent() {
    assert_eq!(canonical_state("California"), "CA");
    assert_eq!(canonical_state("ca"), "CA");

    let profile = normalize_profile(&ProfileForm {
        state: Some("California".to_string()),
        ..create_test_form()
    })
    .unwrap();

    let mut record = create_test_record("ca");
    record.states = vec!["CA".to_string()];
    let catalog = normalize_records(&[record]);

    assert!(check_hard_filters(&profile, &catalog.scholarships[0]).is_ok());
}

#[test]
fn test_gpa_below_minimum_is_ineligible() {
    let profile = normalize_profile(&ProfileForm {
        gpa: Some(2.9),
        ..create_test_form()
    })
    .unwrap();
    let scholarship = create_test_scholarship("cs");

    match check_hard_filters(&profile, &scholarship) {
        Err(HardFilterReason::Gpa { required, actual }) => {
            assert_eq!(required, 3.0);
            assert_eq!(actual, 2.9);
        }
        other => panic!("expected GPA failure, got {:?}", other),
    }
}

#[test]
fn test_gpa_equal_to_minimum_passes() {
    let profile = normalize_profile(&ProfileForm {
        gpa: Some(3.0),
        ..create_test_form()
    })
    .unwrap();

    assert!(check_hard_filters(&profile, &create_test_scholarship("cs")).is_ok());
}

#[test]
fn test_grade_level_not_listed_is_ineligible() {
    let profile = normalize_profile(&ProfileForm {
        grade_level: Some("Graduate Student".to_string()),
        ..create_test_form()
    })
    .unwrap();

    assert!(matches!(
        check_hard_filters(&profile, &create_test_scholarship("cs")),
        Err(HardFilterReason::GradeLevel { .. })
    ));
}

#[test]
fn test_open_scholarship_has_neutral_factors() {
    let record = ScholarshipRecord {
        id: Some("open".to_string()),
        title: Some("Open Award".to_string()),
        min_gpa: Some(0.0),
        deadline: Some("2027-01-01".to_string()),
        ..ScholarshipRecord::default()
    };
    let catalog = normalize_records(&[record]);

    let card = calculate_match_score(
        &create_test_profile(),
        &catalog.scholarships[0],
        &ScoringModel::default(),
    );

    // No tags anywhere: every preference is "no preference"
    assert_eq!(card.match_score, 100);
}

#[test]
fn test_deadline_urgency_boundaries() {
    assert_eq!(urgency_for(-1), Urgency::Critical);
    assert_eq!(urgency_for(6), Urgency::Critical);
    assert_eq!(urgency_for(7), Urgency::Urgent);
    assert_eq!(urgency_for(29), Urgency::Urgent);
    assert_eq!(urgency_for(30), Urgency::Upcoming);
    assert_eq!(urgency_for(89), Urgency::Upcoming);
    assert_eq!(urgency_for(90), Urgency::Normal);

    let deadline = NaiveDate::from_ymd_opt(2026, 11, 15).unwrap();
    assert_eq!(days_until_deadline(deadline, today()), 45);
}

#[test]
fn test_match_score_within_valid_range() {
    let matcher = Matcher::default();
    let profile = create_test_profile();

    let mut records = Vec::new();
    for i in 0..20 {
        let mut record = create_test_record(&format!("s{}", i));
        if i % 2 == 0 {
            record.major_tags = vec!["Nursing".to_string()];
        }
        if i % 3 == 0 {
            record.interest_tags = vec!["choir".to_string(), "coding".to_string()];
        }
        if i % 5 == 0 {
            record.demographic_preferences = vec!["Native American".to_string()];
        }
        records.push(record);
    }
    let catalog = normalize_records(&records);

    let outcome = matcher.find_matches(&profile, &catalog.scholarships, today());
    assert!(!outcome.matches.is_empty());
    for m in &outcome.matches {
        assert!(
            m.match_score >= 40 && m.match_score <= 100,
            "score {} out of range",
            m.match_score
        );
    }
}

#[test]
fn test_shared_interests_never_lower_score() {
    let mut record = create_test_record("multi");
    record.interest_tags = vec!["coding".to_string(), "robotics".to_string(), "chess".to_string()];
    let catalog = normalize_records(&[record]);
    let scholarship = &catalog.scholarships[0];
    let model = ScoringModel::default();

    let mut form = create_test_form();
    form.interests = vec![];
    let mut previous = 0;

    for interest in ["coding", "robotics", "chess"] {
        form.interests.push(interest.to_string());
        let profile = normalize_profile(&form).unwrap();
        let score = calculate_match_score(&profile, scholarship, &model).match_score;
        assert!(score >= previous, "adding {} dropped the score", interest);
        previous = score;
    }

    assert_eq!(previous, 100);
}

#[test]
fn test_matching_is_repeatable() {
    let matcher = Matcher::default();
    let profile = create_test_profile();
    let records: Vec<ScholarshipRecord> = (0..10).map(|i| create_test_record(&i.to_string())).collect();
    let catalog = normalize_records(&records);

    let first = matcher.find_matches(&profile, &catalog.scholarships, today());
    let second = matcher.find_matches(&profile, &catalog.scholarships, today());

    assert_eq!(first.matches, second.matches);
}

#[test]
fn test_equal_scores_ordered_by_deadline() {
    let mut late = create_test_record("late");
    late.deadline = Some("2027-03-01".to_string());
    let mut soon = create_test_record("soon");
    soon.deadline = Some("2026-10-05".to_string());
    let mut mid = create_test_record("mid");
    mid.deadline = Some("2026-12-01".to_string());
    let catalog = normalize_records(&[late, soon, mid]);

    let outcome = Matcher::default().find_matches(&create_test_profile(), &catalog.scholarships, today());
    let ids: Vec<&str> = outcome.matches.iter().map(|m| m.scholarship.id.as_str()).collect();

    assert_eq!(ids, vec!["soon", "mid", "late"]);
    assert_eq!(outcome.matches[0].urgency, Urgency::Critical);
}

#[test]
fn test_malformed_records_are_skipped() {
    let mut no_deadline = create_test_record("broken");
    no_deadline.deadline = None;
    let mut bad_date = create_test_record("bad-date");
    bad_date.deadline = Some("next spring".to_string());

    let catalog = normalize_records(&[create_test_record("ok"), no_deadline, bad_date]);

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.warnings.len(), 2);
    assert_eq!(catalog.warnings[0].record_index, 1);
    assert_eq!(catalog.warnings[1].scholarship_id.as_deref(), Some("bad-date"));
}

#[test]
fn test_any_major_tag_is_open_to_every_major() {
    let profile = normalize_profile(&ProfileForm {
        major: Some("Art History".to_string()),
        ..create_test_form()
    })
    .unwrap();

    let mut record = create_test_record("any-major");
    record.major_tags = vec!["Engineering".to_string(), "Any".to_string()];
    let catalog = normalize_records(&[record]);
    assert!(catalog.scholarships[0].major_tags.is_empty());

    let outcome = Matcher::default().find_matches(&profile, &catalog.scholarships, today());
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].factor_breakdown[&Factor::Major], 1.0);
    assert_eq!(outcome.matches[0].match_score, 100);
}

#[test]
fn test_demographic_partial_credit_through_matcher() {
    let mut record = create_test_record("demo");
    record.demographic_preferences = vec!["Hispanic/Latino".to_string(), "Female".to_string()];
    let catalog = normalize_records(&[record]);

    let both = normalize_profile(&ProfileForm {
        ethnicity: vec!["Hispanic/Latino".to_string()],
        gender: Some("Female".to_string()),
        ..create_test_form()
    })
    .unwrap();
    let one = normalize_profile(&ProfileForm {
        ethnicity: vec!["Asian".to_string()],
        gender: Some("Female".to_string()),
        ..create_test_form()
    })
    .unwrap();
    let undisclosed = normalize_profile(&ProfileForm {
        ethnicity: vec!["Prefer not to say".to_string()],
        gender: Some("Prefer not to say".to_string()),
        ..create_test_form()
    })
    .unwrap();

    let matcher = Matcher::default();
    let score = |profile: &StudentProfile| {
        let outcome = matcher.find_matches(profile, &catalog.scholarships, today());
        (
            outcome.matches[0].factor_breakdown[&Factor::Demographics],
            outcome.matches[0].match_score,
        )
    };

    assert_eq!(score(&both), (1.0, 100));
    assert_eq!(score(&one), (0.5, 95));
    assert_eq!(score(&undisclosed), (0.0, 90));

    // Partial credit follows the model
    let stingy = Matcher::new(ScoringModel {
        demographic_partial_credit: 0.0,
        ..ScoringModel::default()
    });
    let outcome = stingy.find_matches(&one, &catalog.scholarships, today());
    assert_eq!(outcome.matches[0].match_score, 90);
}
