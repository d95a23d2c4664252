use super::*;

#[test]
fn new_session_greets_the_user() {
    let session = Session::new();

    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].role, Role::Assistant);
    assert_eq!(session.history()[0].content, WELCOME_MESSAGE);
    assert_eq!(session.interest_score(), INITIAL_INTEREST_SCORE);
    assert_eq!(session.interest_history(), &[INITIAL_INTEREST_SCORE]);
    assert!(session.query_log().is_empty());
}

#[test]
fn commitment_phrases_score_highest() {
    assert_eq!(update_interest_score("yes add it to my order", 50), 75);
    assert_eq!(update_interest_score("I'll take the combo", 50), 75);
}

#[test]
fn browsing_keywords_score_lower() {
    assert_eq!(update_interest_score("I want something cheesy", 50), 65);
}

#[test]
fn positive_reactions_and_hunger_raise_the_score() {
    assert_eq!(update_interest_score("that sounds great", 50), 62);
    assert_eq!(update_interest_score("I'm so hungry", 50), 60);
}

#[test]
fn negative_phrases_lower_the_score() {
    assert_eq!(update_interest_score("no thanks", 50), 42);
}

#[test]
fn first_matching_group_wins() {
    // "no" alone would subtract, but the commitment group is checked first
    assert_eq!(update_interest_score("no wait, add it", 50), 75);
}

#[test]
fn unmatched_messages_leave_the_score_alone() {
    assert_eq!(update_interest_score("tell me about the menu", 50), 50);
}

#[test]
fn score_is_clamped_to_bounds() {
    assert_eq!(update_interest_score("yes add it", 95), 100);
    assert_eq!(update_interest_score("no thanks", 3), 0);
}

#[test]
fn apply_interest_tracks_the_score_curve() {
    let mut session = Session::new();

    assert_eq!(session.apply_interest("I want a burger"), 65);
    assert_eq!(session.apply_interest("no thanks"), 57);
    assert_eq!(session.interest_history(), &[50, 65, 57]);
}

#[test]
fn history_keeps_turns_in_order() {
    let mut session = Session::new();
    session.push_user("show me burgers");
    session.push_assistant("Here are our burgers.");

    assert_eq!(session.history().len(), 3);
    assert_eq!(session.history()[1].role, Role::User);
    assert_eq!(session.history()[1].content, "show me burgers");
    assert_eq!(session.history()[2].role, Role::Assistant);
}

#[test]
fn reset_restores_the_initial_state() {
    let mut session = Session::new();
    session.push_user("burger please");
    session.apply_interest("burger please");
    session.record_query(QueryLogEntry::new("burger please", "Classic Burger".to_string(), 0.91, 12.5));

    session.reset();

    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].content, WELCOME_MESSAGE);
    assert_eq!(session.interest_score(), INITIAL_INTEREST_SCORE);
    assert_eq!(session.interest_history(), &[INITIAL_INTEREST_SCORE]);
    assert!(session.query_log().is_empty());
}

#[test]
fn query_log_entries_are_stamped_with_wall_clock_time() {
    let entry = QueryLogEntry::new("burger", "Classic Burger".to_string(), 0.91, 12.5);

    assert_eq!(entry.timestamp.len(), 8);
    let colons: Vec<usize> = entry
        .timestamp
        .char_indices()
        .filter(|&(_, c)| c == ':')
        .map(|(i, _)| i)
        .collect();
    assert_eq!(colons, vec![2, 5]);
    assert_eq!(entry.user_query, "burger");
    assert_eq!(entry.top_match, "Classic Burger");
}

#[test]
fn role_labels_match_the_prompt_format() {
    assert_eq!(Role::User.label(), "user");
    assert_eq!(Role::Assistant.label(), "assistant");
}
