use super::support::{asset_id, post, post_id, valid_nonce, Fixture};
use crate::domain::generated_image::fixtures::PNG_1X1;
use crate::domain::{Nonce, NonceAction, SaveEvent};
use crate::ports::outbound::{MediaCatalog, PostRepository};
use crate::usecase::SaveHookOutcome;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

fn sunset_fixture(api_key: Option<&str>) -> Fixture {
    Fixture::new(
        api_key,
        vec![
            post(42, "post", "Sunset", "A photo of a sunset over mountains"),
            post(43, "page", "About", "<p>About us</p>"),
        ],
        PNG_1X1,
    )
}

fn generate_nonce() -> Nonce {
    valid_nonce(NonceAction::Generate)
}

#[test]
fn test_generate_stage_and_promote_on_save() {
    let f = sunset_fixture(Some("test-key"));

    let staged = f.generate.handle("42", &generate_nonce()).unwrap();
    assert_eq!(
        f.generators.prompts(),
        vec!["Sunset A photo of a sunset over mountains".to_string()]
    );
    assert_eq!(staged.post, post_id(42));
    assert_eq!(staged.image.bytes(), PNG_1X1);
    assert_eq!(staged.asset.mime_type, "image/png");
    assert!(staged.asset.file_path.ends_with(".png"));
    assert_eq!(staged.asset.parent, post_id(42));

    // アップロード先に同一内容のファイルがある
    let stored = f
        .fs
        .read(&f.site.uploads_dir().join(&staged.asset.file_path))
        .unwrap();
    assert_eq!(stored, PNG_1X1);
    let cataloged = f.catalog.find_asset(staged.asset.id).unwrap().unwrap();
    assert_eq!(cataloged.file_path, staged.asset.file_path);
    let metadata = cataloged.metadata.unwrap();
    assert_eq!((metadata.width, metadata.height), (Some(1), Some(1)));

    assert_eq!(
        f.pending.peek_pending(post_id(42)).unwrap(),
        Some(staged.asset.id)
    );
    // 保存前はアイキャッチ未設定
    assert!(f.posts.assigned().is_empty());

    let saved = f.posts.find_post(post_id(42)).unwrap().unwrap();
    let outcome = f.save_hook.on_save(&SaveEvent::new(saved.clone())).unwrap();
    assert_eq!(outcome, SaveHookOutcome::Assigned(staged.asset.id));
    assert_eq!(f.posts.assigned(), vec![(post_id(42), staged.asset.id)]);
    assert_eq!(f.pending.peek_pending(post_id(42)).unwrap(), None);

    let again = f.save_hook.on_save(&SaveEvent::new(saved)).unwrap();
    assert_eq!(again, SaveHookOutcome::NothingPending);
    assert_eq!(f.posts.assigned().len(), 1);
}

#[test]
fn test_staged_json_carries_preview_bytes() {
    let f = sunset_fixture(Some("test-key"));
    let staged = f.generate.handle("42", &generate_nonce()).unwrap();
    let v = staged.to_json();
    assert_eq!(v["post_id"], 42);
    assert_eq!(v["asset_id"], staged.asset.id.get());
    assert_eq!(v["mime_type"], "image/png");
    let bytes = STANDARD
        .decode(v["image_base64"].as_str().unwrap())
        .unwrap();
    assert_eq!(bytes, PNG_1X1);
}

#[test]
fn test_missing_credential_makes_no_request() {
    for key in [None, Some(""), Some("   ")] {
        let f = sunset_fixture(key);
        let err = f.generate.handle("42", &generate_nonce()).unwrap_err();
        assert!(
            err.to_string().starts_with("missing credential"),
            "got: {}",
            err
        );
        assert_eq!(err.exit_code(), 78);
        assert_eq!(f.generators.created(), 0);
        assert_eq!(f.pending.peek_pending(post_id(42)).unwrap(), None);
    }
}

#[test]
fn test_invalid_nonce_is_rejected_first() {
    let f = sunset_fixture(None);
    // 資格情報も無いが、nonce の検証が先
    let err = f.generate.handle("42", &Nonce::new("forged")).unwrap_err();
    assert_eq!(err.exit_code(), 77);

    // 別の操作用のトークンは使えない
    let err = f
        .generate
        .handle("42", &valid_nonce(NonceAction::Assign))
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid nonce"));
    assert_eq!(f.generators.created(), 0);
}

#[test]
fn test_invalid_post_identifier() {
    let f = sunset_fixture(Some("test-key"));
    for id in ["", "0", "abc", "-3"] {
        let err = f.generate.handle(id, &generate_nonce()).unwrap_err();
        assert_eq!(err.exit_code(), 64, "id {:?}: {}", id, err);
        assert!(err.to_string().starts_with("invalid identifier"));
    }
    assert_eq!(f.generators.created(), 0);
}

#[test]
fn test_unknown_post_is_not_found() {
    let f = sunset_fixture(Some("test-key"));
    let err = f.generate.handle("99", &generate_nonce()).unwrap_err();
    assert_eq!(err.exit_code(), 66);
    assert!(err.to_string().starts_with("not found"));
    assert_eq!(f.generators.created(), 0);
}

#[test]
fn test_ineligible_post_type() {
    let f = sunset_fixture(Some("test-key"));
    let err = f.generate.handle("43", &generate_nonce()).unwrap_err();
    assert_eq!(err.exit_code(), 65);
    assert!(err.to_string().starts_with("wrong content type"));
    assert_eq!(f.generators.created(), 0);
}

#[test]
fn test_empty_image_leaves_no_asset_or_pending() {
    let f = Fixture::new(
        Some("test-key"),
        vec![post(42, "post", "Sunset", "")],
        &[],
    );
    let err = f.generate.handle("42", &generate_nonce()).unwrap_err();
    assert!(err.to_string().starts_with("missing image data"));
    assert_eq!(f.catalog.find_asset(asset_id(1)).unwrap(), None);
    assert_eq!(f.pending.peek_pending(post_id(42)).unwrap(), None);
}

#[test]
fn test_second_generation_replaces_pending() {
    let f = sunset_fixture(Some("test-key"));
    let first = f.generate.handle("42", &generate_nonce()).unwrap();
    let second = f.generate.handle("42", &generate_nonce()).unwrap();
    assert_ne!(first.asset.id, second.asset.id);
    assert_eq!(
        f.pending.peek_pending(post_id(42)).unwrap(),
        Some(second.asset.id)
    );
    // 1 回目のアセットはカタログに残る
    assert!(f.catalog.find_asset(first.asset.id).unwrap().is_some());
}

#[test]
fn test_markup_is_stripped_from_prompt() {
    let f = Fixture::new(
        Some("test-key"),
        vec![post(
            42,
            "post",
            "<b>Sunset</b>",
            "<p>Over <em>mountains</em></p><script>alert(1)</script>",
        )],
        PNG_1X1,
    );
    f.generate.handle("42", &generate_nonce()).unwrap();
    assert_eq!(f.generators.prompts(), vec!["Sunset Over mountains".to_string()]);
}
