use chrono::{Duration, TimeZone, Utc};
use goaltrack_core::{
    Collection, FriendPolicy, Goal, InMemoryUserRepository, InvalidReference, ProfilePicture,
    UserRepository, UserService, UserServiceError,
};

fn service() -> UserService<InMemoryUserRepository> {
    UserService::new(InMemoryUserRepository::new())
}

#[test]
fn register_and_get_user_roundtrip() {
    let service = service();
    let id = service
        .register_user("ana", "pw", Some(ProfilePicture::new("ana.png")))
        .unwrap();

    let user = service.get_user(id).unwrap();
    assert_eq!(user.uuid, id);
    assert_eq!(user.username, "ana");
    assert_eq!(user.password, "pw");
    assert_eq!(
        user.profile_picture.as_ref().map(ProfilePicture::as_str),
        Some("ana.png")
    );
    assert!(user.goals().is_empty());
    assert!(user.friend_ids().is_empty());
}

#[test]
fn set_profile_picture_replaces_and_clears() {
    let service = service();
    let id = service.register_user("ana", "pw", None).unwrap();

    service
        .set_profile_picture(id, Some(ProfilePicture::new("new.png")))
        .unwrap();
    assert_eq!(
        service.get_user(id).unwrap().profile_picture,
        Some(ProfilePicture::new("new.png"))
    );

    service.set_profile_picture(id, None).unwrap();
    assert_eq!(service.get_user(id).unwrap().profile_picture, None);
}

#[test]
fn goal_flow_check_off_history_and_percentage() {
    let service = service();
    let id = service.register_user("ana", "pw", None).unwrap();
    let t0 = Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap();

    service.create_goal(id, "  Run 5k ").unwrap();
    service.add_goal(id, Goal::new("Read")).unwrap();
    service.check_off_goal_at(id, 0, t0).unwrap();

    assert_eq!(service.goal_names(id).unwrap(), vec!["Run 5k", "Read"]);
    assert_eq!(service.completion_history(id, 0).unwrap(), vec![t0]);
    assert!(service.completion_history(id, 1).unwrap().is_empty());

    let percentage = service
        .completion_percentage_at(id, 0, t0 + Duration::days(2))
        .unwrap();
    assert!((percentage - 50.0).abs() < 1e-9);

    let err = service.completion_percentage(id, 1).unwrap_err();
    assert_eq!(err, UserServiceError::EmptyHistory);
}

#[test]
fn create_goal_rejects_blank_name() {
    let service = service();
    let id = service.register_user("ana", "pw", None).unwrap();

    let err = service.create_goal(id, "   ").unwrap_err();
    assert_eq!(err, UserServiceError::InvalidGoalName);
    assert!(service.goal_names(id).unwrap().is_empty());
}

#[test]
fn failed_check_off_is_not_written_back() {
    let service = service();
    let id = service.register_user("ana", "pw", None).unwrap();
    service.create_goal(id, "Run").unwrap();
    let before = service.get_user(id).unwrap();

    let err = service.check_off_goal(id, 1).unwrap_err();
    assert_eq!(
        err,
        UserServiceError::IndexOutOfRange {
            collection: Collection::Goals,
            index: 1,
            len: 1,
        }
    );
    assert_eq!(service.get_user(id).unwrap(), before);
}

#[test]
fn remove_goal_returns_removed_value() {
    let service = service();
    let id = service.register_user("ana", "pw", None).unwrap();
    service.create_goal(id, "Run").unwrap();
    service.create_goal(id, "Read").unwrap();

    let removed = service.remove_goal(id, 0).unwrap();
    assert_eq!(removed.name, "Run");
    assert_eq!(service.goal_names(id).unwrap(), vec!["Read"]);
}

#[test]
fn friend_mutations_are_visible_through_the_link() {
    let service = service();
    let ana = service.register_user("ana", "pw", None).unwrap();
    let ben = service.register_user("ben", "pw", None).unwrap();

    service.add_friend(ana, ben).unwrap();
    let friends = service.get_user(ana).unwrap();
    assert_eq!(friends.friend_ids().last(), Some(&ben));

    let mut ben_user = service.get_user(ben).unwrap();
    ben_user.username = "benjamin".to_string();
    service.repo().update_user(&ben_user).unwrap();
    service.create_goal(ben, "Climb").unwrap();

    let resolved = service.friends(ana).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].uuid, ben);
    assert_eq!(resolved[0].username, "benjamin");
    assert_eq!(resolved[0].goal_names(), vec!["Climb"]);
}

#[test]
fn friendship_is_not_symmetric() {
    let service = service();
    let ana = service.register_user("ana", "pw", None).unwrap();
    let ben = service.register_user("ben", "pw", None).unwrap();

    service.add_friend(ana, ben).unwrap();

    assert!(service.friends(ben).unwrap().is_empty());
}

#[test]
fn default_policy_rejects_self_and_duplicate_friends() {
    let service = service();
    let ana = service.register_user("ana", "pw", None).unwrap();
    let ben = service.register_user("ben", "pw", None).unwrap();

    let err = service.add_friend(ana, ana).unwrap_err();
    assert_eq!(
        err,
        UserServiceError::InvalidReference(InvalidReference::SelfFriend(ana))
    );

    service.add_friend(ana, ben).unwrap();
    let err = service.add_friend(ana, ben).unwrap_err();
    assert_eq!(
        err,
        UserServiceError::InvalidReference(InvalidReference::DuplicateFriend(ben))
    );
    assert_eq!(service.get_user(ana).unwrap().friend_ids(), &[ben]);
}

#[test]
fn permissive_policy_allows_self_and_duplicate_friends() {
    let service =
        UserService::with_policy(InMemoryUserRepository::new(), FriendPolicy::permissive());
    let ana = service.register_user("ana", "pw", None).unwrap();
    let ben = service.register_user("ben", "pw", None).unwrap();

    service.add_friend(ana, ana).unwrap();
    service.add_friend(ana, ben).unwrap();
    service.add_friend(ana, ben).unwrap();

    assert_eq!(service.get_user(ana).unwrap().friend_ids(), &[ana, ben, ben]);
}

#[test]
fn add_friend_requires_existing_target() {
    let service = service();
    let ana = service.register_user("ana", "pw", None).unwrap();
    let ghost = uuid::Uuid::new_v4();

    let err = service.add_friend(ana, ghost).unwrap_err();
    assert_eq!(err, UserServiceError::UserNotFound(ghost));
    assert!(service.get_user(ana).unwrap().friend_ids().is_empty());
}

#[test]
fn remove_friend_on_empty_list_is_out_of_range() {
    let service = service();
    let ana = service.register_user("ana", "pw", None).unwrap();

    let err = service.remove_friend(ana, 0).unwrap_err();
    assert_eq!(
        err,
        UserServiceError::IndexOutOfRange {
            collection: Collection::Friends,
            index: 0,
            len: 0,
        }
    );
}

#[test]
fn remove_friend_returns_unlinked_id() {
    let service = service();
    let ana = service.register_user("ana", "pw", None).unwrap();
    let ben = service.register_user("ben", "pw", None).unwrap();
    let cai = service.register_user("cai", "pw", None).unwrap();
    service.add_friend(ana, ben).unwrap();
    service.add_friend(ana, cai).unwrap();

    assert_eq!(service.remove_friend(ana, 0).unwrap(), ben);
    assert_eq!(service.get_user(ana).unwrap().friend_ids(), &[cai]);
}

#[test]
fn find_user_by_username_matches_exactly() {
    let service = service();
    let ben = service.register_user("ben", "pw", None).unwrap();

    assert_eq!(
        service.find_user_by_username("ben").unwrap().map(|u| u.uuid),
        Some(ben)
    );
    assert!(service.find_user_by_username("Ben").unwrap().is_none());
}

#[test]
fn export_user_lists_goals_and_friend_ids() {
    let service = service();
    let ana = service.register_user("ana", "pw", None).unwrap();
    let ben = service.register_user("ben", "pw", None).unwrap();
    service.create_goal(ana, "Run").unwrap();
    service.add_friend(ana, ben).unwrap();

    let record = service.export_user(ana).unwrap();
    assert_eq!(record.uuid, ana);
    assert_eq!(record.goals.len(), 1);
    assert_eq!(record.goals[0].goal.name, "Run");
    assert_eq!(record.friend_ids, vec![ben]);
}
