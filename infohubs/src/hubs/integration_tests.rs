//! End-to-end tests of the hub pair with the built-in facts.

use super::*;
use crate::context::{BrainRef, Content, ContentRef, Request};
use crate::core::{Handle, ResolutionState};
use crate::facts::TranslationProxy;
use crate::ports::{
    AuthorDirectory, AuthorProfile, BookCapability, Member, MockMembership, MockSearchIndex,
    MockSessionStore, PropertySheets, SessionStore,
};
use crate::testing::{
    assert_fact_eq, assert_unresolved, HubFixture, MemoryCatalog, MemorySession, StaticBrain,
    StaticContent, StaticEnvironment, StaticMembership, StaticPortalState, StaticProperties,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

fn shared_document(groups: &[&str]) -> StaticContent {
    StaticContent::new("report", "Document")
        .with_uid("report-uid")
        .with_creator("bob")
        .with_groups(groups.iter().copied())
}

fn specifiers(pairs: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.map(str::to_string)))
        .collect()
}

// Group id resolution

#[test]
fn test_gid_from_membership_leaves_session_alone() {
    let session = Arc::new(MemorySession::new());
    let fixture = HubFixture::new()
        .with_content(shared_document(&["g1", "g2"]))
        .with_membership(Arc::new(StaticMembership::member("alice").with_group("g2")))
        .with_session(Arc::clone(&session));
    let (_, info) = fixture.build();

    assert_fact_eq(&info, "gid", "g2");
    assert_eq!(session.writes(), 0);
    assert_eq!(session.value("desktop_groups"), None);
}

#[test]
fn test_explicit_no_group_is_pushed_once() {
    let session = Arc::new(MemorySession::new().with_value("desktop_groups", json!(["g1"])));
    let fixture = HubFixture::new()
        .with_request(Request::new().with_form("gid", "None"))
        .with_session(Arc::clone(&session));

    let (_, info) = fixture.build();
    assert_fact_eq(&info, "gid", Value::None);
    assert_eq!(session.value("desktop_groups"), Some(json!(["g1", null])));
    assert_eq!(session.writes(), 1);

    // Already on top: a second request does not write again.
    let (_, info) = fixture.build();
    assert_fact_eq(&info, "gid", Value::None);
    assert_eq!(session.writes(), 1);
}

#[test]
fn test_legacy_no_group_entry_is_not_rewritten() {
    let session =
        Arc::new(MemorySession::new().with_value("desktop_groups", json!(["g1", "None"])));
    let (_, info) = HubFixture::new()
        .with_request(Request::new().with_form("gid", "None"))
        .with_session(Arc::clone(&session))
        .build();

    assert_fact_eq(&info, "gid", Value::None);
    assert_eq!(session.writes(), 0);
    assert_eq!(session.value("desktop_groups"), Some(json!(["g1", "None"])));
}

#[test]
fn test_explicit_group_moves_to_top() {
    let session =
        Arc::new(MemorySession::new().with_value("desktop_groups", json!(["g1", "g2"])));
    let (_, info) = HubFixture::new()
        .with_request(Request::new().with_form("gid", "g1"))
        .with_session(Arc::clone(&session))
        .build();

    assert_fact_eq(&info, "gid", "g1");
    assert_eq!(session.value("desktop_groups"), Some(json!(["g2", "g1"])));
}

#[test]
fn test_folder_pop_last() {
    let mut groups = vec!["g1".to_string(), "g2".to_string()];
    let result = crate::facts::select_group(
        &mut groups,
        true,
        &crate::utils::UniqueStack::new(),
        || Ok(false),
        |_| Ok(false),
    )
    .unwrap();

    assert_eq!(result.group_id(), Some("g2"));
    assert_eq!(groups, vec!["g1".to_string()]);
}

#[test]
fn test_folder_context_has_no_group() {
    let (_, info) = HubFixture::new()
        .with_content(StaticContent::new("desktop", "Folder").with_groups(["g1", "g2"]))
        .with_membership(Arc::new(StaticMembership::member("alice").with_group("g1")))
        .build();

    assert_fact_eq(&info, "cooperating_groups", Value::List(Vec::new()));
    assert_fact_eq(&info, "gid", Value::None);
}

#[test]
fn test_session_sentinel_stops_scan() {
    let session =
        Arc::new(MemorySession::new().with_value("desktop_groups", json!(["g1", "None"])));
    let (_, info) = HubFixture::new()
        .with_content(shared_document(&["g1"]))
        .with_membership(Arc::new(StaticMembership::member("alice").with_group("g1")))
        .with_session(session)
        .build();

    assert_fact_eq(&info, "gid", Value::None);
}

#[test]
fn test_own_object_prefers_desktop() {
    let (_, info) = HubFixture::new()
        .with_content(shared_document(&["g1"]))
        .with_membership(Arc::new(StaticMembership::member("bob").with_group("g1")))
        .build();

    assert_fact_eq(&info, "is_mine", true);
    assert_fact_eq(&info, "gid", Value::None);
}

#[test]
fn test_unreachable_object_yields_error_sentinel() {
    let (_, info) = HubFixture::new()
        .with_content(shared_document(&["g1"]))
        .with_membership(Arc::new(StaticMembership::member("alice")))
        .build();

    assert_fact_eq(&info, "gid", crate::facts::INCONSISTENT_GROUP);
    assert_eq!(
        crate::facts::GroupResolution::from_value(&info.get("gid").unwrap()),
        crate::facts::GroupResolution::Inconsistent
    );
}

#[test]
fn test_membership_checked_once_per_group() {
    let mut membership = MockMembership::new();
    membership.expect_is_anonymous().return_const(false);
    membership
        .expect_authenticated_member()
        .returning(|| Some(Member::new("alice")));
    membership
        .expect_is_member_of()
        .withf(|user, gid| user == "alice" && gid == "g1")
        .times(1)
        .return_const(true);

    let mut session = MockSessionStore::new();
    session.expect_get().return_const(None::<serde_json::Value>);
    session.expect_set().never();
    let session: Arc<dyn SessionStore> = Arc::new(session);

    let (tools, info) = HubFixture::new()
        .with_content(shared_document(&["g1"]))
        .with_membership(Arc::new(membership))
        .build();
    // Replace the in-memory session before anything reads it.
    tools.preload("session_data_manager", Handle::new(session));

    assert_fact_eq(&info, "gid", "g1");
    assert!(info.lookup::<bool>("is_member_of", "g1").unwrap());
}

#[test]
fn test_group_title() {
    struct Titles;
    impl crate::ports::GroupDirectory for Titles {
        fn group_title(&self, group_id: &str) -> Option<String> {
            Some(format!("Group {group_id}"))
        }
    }
    let directory: Arc<dyn crate::ports::GroupDirectory> = Arc::new(Titles);

    let (_, info) = HubFixture::new()
        .with_request(Request::new().with_form("gid", "g7").with_form("group_id", "None"))
        .with_environment(StaticEnvironment::new().with_tool("portal_groups", Handle::new(directory)))
        .build();

    assert_fact_eq(&info, "group_title", "Group g7");
    assert_fact_eq(&info, "managed_group_title", Value::None);
}

// Translation resolution

fn translation_fixture(object: ContentRef, lang: &str) -> HubFixture {
    let site = StaticContent::new("plone", "Plone Site")
        .with_path("/plone")
        .with_child("a/b", object);
    HubFixture::new().with_portal(Arc::new(
        StaticPortalState::new(Arc::new(site)).with_language(lang),
    ))
}

fn translation_proxy(info: &DerivedHub) -> Arc<TranslationProxy> {
    info.proxy::<HashMap<String, Option<String>>, Vec<(String, String)>, Option<ContentRef>>(
        "my_translation",
    )
    .unwrap()
}

#[test]
fn test_translation_same_language_is_unchanged() {
    let object: ContentRef = Arc::new(StaticContent::new("b", "Document").with_language("de"));
    let (_, info) = translation_fixture(Arc::clone(&object), "de").build();

    let found = translation_proxy(&info)
        .get(&specifiers(&[("path", Some("/a/b"))]))
        .unwrap()
        .unwrap();
    assert!(Arc::ptr_eq(&found, &object));
}

#[test]
fn test_translation_is_substituted() {
    let german: ContentRef = Arc::new(StaticContent::new("b-de", "Document").with_language("de"));
    let object: ContentRef = Arc::new(
        StaticContent::new("b", "Document")
            .with_language("en")
            .with_translation("de", Arc::clone(&german)),
    );
    let (_, info) = translation_fixture(object, "de").build();

    let found = translation_proxy(&info)
        .get(&specifiers(&[("path", Some("/a/b"))]))
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), "b-de");
}

#[test]
fn test_translation_without_specifier_fails() {
    let (_, info) = HubFixture::new().build();

    let err = translation_proxy(&info).get(&HashMap::new()).unwrap_err();
    assert_eq!(err.kind(), "configuration");

    let err = translation_proxy(&info)
        .get(&specifiers(&[("path", None), ("uid", Some(""))]))
        .unwrap_err();
    assert_eq!(err.kind(), "configuration");
}

#[test]
fn test_translation_by_uid_is_memoized() {
    let object: ContentRef = Arc::new(StaticContent::new("b", "Document").with_uid("u1"));
    let mut catalog = MockSearchIndex::new();
    let brain: BrainRef = Arc::new(StaticBrain::of(Arc::clone(&object)));
    catalog
        .expect_find_by_uid()
        .withf(|uid| uid == "u1")
        .times(1)
        .returning(move |_| Some(Arc::clone(&brain)));

    let (_, info) = HubFixture::new().with_catalog(Arc::new(catalog)).build();
    let proxy = translation_proxy(&info);

    let first = proxy
        .get(&specifiers(&[("uid", Some("u1")), ("path", None)]))
        .unwrap();
    let second = proxy.get(&specifiers(&[("uid", Some("u1"))])).unwrap();

    assert!(Arc::ptr_eq(&first.unwrap(), &object));
    assert!(second.is_some());
    assert_eq!(proxy.len(), 1);
}

// UID lookups

#[test]
fn test_uid_lookups() {
    let catalog = MemoryCatalog::new()
        .with_brain(Arc::new(StaticBrain::new("u1", "/portal/docs/item")))
        .with_hidden(Arc::new(StaticBrain::new("u2", "/portal/private/memo")));
    let (_, info) = HubFixture::new().with_catalog(Arc::new(catalog)).build();

    assert_eq!(
        info.lookup::<Option<String>>("uid2path", "u1").unwrap().as_deref(),
        Some("docs/item")
    );
    assert_eq!(
        info.lookup::<Option<String>>("uid2fullpath", "u1").unwrap().as_deref(),
        Some("/portal/docs/item")
    );
    assert_eq!(info.lookup::<Option<String>>("uid2path", "nope").unwrap(), None);
    assert_eq!(
        info.lookup::<Option<String>>("uid2url", "u2").unwrap().as_deref(),
        Some("http://nohost/portal/private/memo")
    );
    assert!(info.lookup::<Option<BrainRef>>("uid2brain", "u2").unwrap().is_none());
}

#[test]
fn test_context_as_brain() {
    let catalog =
        MemoryCatalog::new().with_brain(Arc::new(StaticBrain::new("doc-uid", "/plone/doc")));
    let (_, info) = HubFixture::new().with_catalog(Arc::new(catalog)).build();

    let brain = info
        .capability::<dyn crate::context::Brain>("context_as_brain")
        .unwrap()
        .unwrap();
    assert_eq!(brain.path(), "/plone/doc");
}

#[test]
fn test_context_without_uid() {
    let (_, info) = HubFixture::new()
        .with_content(StaticContent::new("plain", "Document"))
        .build();

    assert_fact_eq(&info, "my_uid", Value::None);
    assert_fact_eq(&info, "has_uid", false);
    assert_fact_eq(&info, "context_as_brain", Value::None);
}

// User chain and permissions

#[test]
fn test_anonymous_user_chain() {
    let (_, info) = HubFixture::new().build();

    assert_fact_eq(&info, "logged_in", false);
    assert_fact_eq(&info, "user_object", Value::None);
    assert_fact_eq(&info, "user_id", Value::None);
    assert_fact_eq(&info, "author_object", Value::None);
    assert_fact_eq(&info, "user_email", Value::None);
    assert_fact_eq(&info, "is_mine", false);
}

#[test]
fn test_author_chain() {
    struct Authors;
    impl AuthorDirectory for Authors {
        fn by_user_id(&self, user_id: &str) -> Option<AuthorProfile> {
            Some(AuthorProfile {
                user_id: user_id.to_string(),
                email: Some(format!("{user_id}@example.org")),
            })
        }
    }
    let authors: Arc<dyn AuthorDirectory> = Arc::new(Authors);

    let (_, info) = HubFixture::new()
        .with_membership(Arc::new(StaticMembership::member("alice")))
        .with_environment(StaticEnvironment::new().with_browser("author", Handle::new(authors)))
        .build();

    assert_fact_eq(&info, "user_id", "alice");
    assert_fact_eq(&info, "user_email", "alice@example.org");
}

#[test]
fn test_missing_author_directory() {
    let (_, info) = HubFixture::new()
        .with_membership(Arc::new(StaticMembership::member("alice")))
        .build();

    assert_fact_eq(&info, "author_object", Value::None);
    assert_fact_eq(&info, "user_email", Value::None);
}

#[test]
fn test_permission_checks_are_memoized() {
    let membership = Arc::new(StaticMembership::member("alice").with_permission("View"));
    let (_, info) = HubFixture::new()
        .with_membership(Arc::clone(&membership) as Arc<dyn crate::ports::Membership>)
        .build();

    assert!(info.lookup::<bool>("has_perm", "View").unwrap());
    assert!(info.lookup::<bool>("has_perm", "View").unwrap());
    assert!(!info.lookup::<bool>("has_perm", "Modify portal content").unwrap());
    assert_eq!(membership.permission_checks(), 2);
}

// Capabilities

#[test]
fn test_detectors_are_tri_state() {
    struct Books;
    impl BookCapability for Books {
        fn is_book(&self, _brain: Option<&dyn crate::context::Brain>) -> bool {
            true
        }
    }
    let books: Arc<dyn BookCapability> = Arc::new(Books);

    let (_, info) = HubFixture::new().build();
    assert_fact_eq(&info, "is_book", Value::None);
    assert_fact_eq(&info, "is_presentation", Value::None);
    assert_fact_eq(&info, "st_num", Value::None);

    let (_, info) = HubFixture::new()
        .with_environment(StaticEnvironment::new().with_browser("book", Handle::new(books)))
        .build();
    assert_fact_eq(&info, "is_book", true);
    // Numbering browser missing.
    assert_fact_eq(&info, "st_num", 0_i64);
}

#[test]
fn test_named_sizes() {
    let properties: Arc<dyn PropertySheets> = Arc::new(StaticProperties::new().with_property(
        "imaging_properties",
        "allowed_sizes",
        "mini 200:200\npreview 400:300",
    ));
    let (_, info) = HubFixture::new()
        .with_environment(
            StaticEnvironment::new().with_tool("portal_properties", Handle::new(properties)),
        )
        .build();

    assert_eq!(info.lookup::<Option<i64>>("named_width", "image_preview").unwrap(), Some(400));
    assert_eq!(info.lookup::<Option<i64>>("named_width", "mini").unwrap(), Some(200));
    assert_eq!(info.lookup::<Option<i64>>("named_width", "huge").unwrap(), None);
}

#[test]
fn test_malformed_sizes_fail_and_stay_unresolved() {
    let properties: Arc<dyn PropertySheets> = Arc::new(StaticProperties::new().with_property(
        "imaging_properties",
        "allowed_sizes",
        "mini 200:200\nthumb 128x128",
    ));
    let (_, info) = HubFixture::new()
        .with_environment(
            StaticEnvironment::new().with_tool("portal_properties", Handle::new(properties)),
        )
        .build();

    assert_eq!(info.get("named_sizes").unwrap_err().kind(), "size_parse");
    assert_unresolved(&info, "named_sizes");
    assert_eq!(info.get("named_width").unwrap_err().kind(), "size_parse");
}

#[test]
fn test_blank_size_line_fails() {
    let properties: Arc<dyn PropertySheets> = Arc::new(StaticProperties::new().with_property(
        "imaging_properties",
        "allowed_sizes",
        "mini 200:200\n\npreview 400:300",
    ));
    let (_, info) = HubFixture::new()
        .with_environment(
            StaticEnvironment::new().with_tool("portal_properties", Handle::new(properties)),
        )
        .build();

    assert_eq!(info.get("named_sizes").unwrap_err().kind(), "size_parse");
    assert_unresolved(&info, "named_sizes");
}

#[test]
fn test_missing_size_property_is_empty() {
    let properties: Arc<dyn PropertySheets> = Arc::new(StaticProperties::new());
    let (_, info) = HubFixture::new()
        .with_environment(
            StaticEnvironment::new().with_tool("portal_properties", Handle::new(properties)),
        )
        .build();

    assert_fact_eq(&info, "named_sizes", Value::Map(Default::default()));
}

// Caching and errors

#[test]
fn test_tool_lookup_is_cached_across_facts() {
    let fixture = HubFixture::new().with_membership(Arc::new(StaticMembership::member("alice")));
    let (tools, info) = fixture.build();

    info.get("logged_in").unwrap();
    info.get("user_object").unwrap();
    info.lookup::<bool>("has_perm", "View").unwrap();

    assert_eq!(fixture.environment().lookups("portal_membership"), 1);
    assert_eq!(tools.state("portal_membership"), ResolutionState::Resolved);
}

#[test]
fn test_missing_required_tool_propagates() {
    let (tools, info) = HubFixture::new().build();

    let err = info.get("view_url").unwrap_err();
    assert!(matches!(err, HubError::Lookup { kind: "tool", .. }));
    assert_unresolved(&info, "view_url");
    assert!(!tools.contains("plone_context_state"));
}

#[test]
fn test_cycle_between_facts_is_reported() {
    let registry = FactoryRegistry::standard()
        .register("left", |hub| hub.get("right"))
        .register("right", |hub| hub.get("left"));
    let (_, info) = HubFixture::new().with_registry(registry).build();

    let err = info.get("left").unwrap_err();
    assert_eq!(err.kind(), "circular_dependency");
    // The unrelated facts still work.
    assert_fact_eq(&info, "portal_type", "Document");
}

#[test]
fn test_concurrent_readers_share_one_resolution() {
    let started = Arc::new(Barrier::new(2));
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = {
        let started = Arc::clone(&started);
        let calls = Arc::clone(&calls);
        FactoryRegistry::new().register("slow", move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            started.wait();
            std::thread::sleep(Duration::from_millis(50));
            Ok(Value::Int(42))
        })
    };
    let (_, info) = HubFixture::new().with_registry(registry).build();
    let info = Arc::new(info);

    let owner = {
        let info = Arc::clone(&info);
        std::thread::spawn(move || info.get("slow"))
    };
    started.wait();
    let second = info.get("slow");

    assert_eq!(owner.join().unwrap().unwrap(), Value::Int(42));
    assert_eq!(second.unwrap(), Value::Int(42));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_request_facts() {
    let (_, info) = HubFixture::new()
        .with_request(
            Request::new()
                .with_form("audit-mode", "0")
                .with_form("uid", "")
                .with_form("pid", "print")
                .with_published_template("document_view"),
        )
        .build();

    assert_fact_eq(&info, "audit_mode", false);
    assert_fact_eq(&info, "tooltip_divs", true);
    assert_fact_eq(&info, "uid", Value::None);
    assert_fact_eq(&info, "export_profile_id", "print");
    assert_fact_eq(&info, "template_id", "document_view");
}

#[test]
fn test_portal_facts() {
    let (_, info) = HubFixture::new().build();

    assert_fact_eq(&info, "portal_url", "http://nohost/plone");
    assert_fact_eq(&info, "portal_id", "plone");
    assert_fact_eq(&info, "current_lang", Value::None);
    assert_fact_eq(&info, "desktop_url", Value::None);
    assert_fact_eq(&info, "portal_and_site_objects", true);
    assert_fact_eq(&info, "temp_folder", Value::None);
}

#[test]
fn test_site_and_temp_folder() {
    let temp: ContentRef = Arc::new(StaticContent::new("temp", "Folder").with_path("/plone/temp"));
    let site: ContentRef =
        Arc::new(StaticContent::new("plone", "Plone Site").with_child("temp", temp));
    let subsite: ContentRef =
        Arc::new(StaticContent::new("sub", "Subsite").with_path("/plone/sub"));
    let portal = StaticPortalState::new(site).with_site(subsite);
    let (_, info) = HubFixture::new().with_portal(Arc::new(portal)).build();

    let site = info.capability::<dyn Content>("site_object").unwrap().unwrap();
    assert_eq!(site.id(), "sub");
    assert_fact_eq(&info, "portal_and_site_objects", false);

    let temp = info.capability::<dyn Content>("temp_folder").unwrap().unwrap();
    assert_eq!(temp.absolute_url(), "http://nohost/plone/temp");
}
