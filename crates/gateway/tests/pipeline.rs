//! Pipeline tests: the orchestrator drives an in-process page (the real
//! `yk-page` handler, no socket) and a fake provider.

use std::sync::Arc;

use parking_lot::Mutex;

use yk_contextpack::policy;
use yk_domain::config::PageConfig;
use yk_domain::context::EditMode;
use yk_domain::error::{Error, Result};
use yk_domain::provider::ProviderId;
use yk_page::{Document, Element, NodeHandle, NotificationKind, Page};
use yk_protocol::{PageAction, PageReply};
use yk_providers::{NoteProvider, NoteRequest, ProviderRegistry};

use yk_gateway::pipeline::{OperationState, Orchestrator, PageBridge};
use yk_gateway::settings::SettingsStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fakes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Clone)]
enum FakeReply {
    Note(&'static str),
    Http(u16, &'static str),
    Empty,
}

struct FakeProvider {
    id: ProviderId,
    reply: FakeReply,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn new(id: ProviderId, reply: FakeReply) -> Arc<Self> {
        Arc::new(Self {
            id,
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl NoteProvider for FakeProvider {
    async fn generate(&self, req: &NoteRequest) -> Result<String> {
        self.prompts.lock().push(req.prompt.clone());
        match &self.reply {
            FakeReply::Note(text) => Ok(text.to_string()),
            FakeReply::Http(status, body) => Err(Error::ProviderHttp {
                provider: self.id.as_str().into(),
                status: *status,
                body: body.to_string(),
            }),
            FakeReply::Empty => Err(Error::EmptyResponse(self.id.as_str().into())),
        }
    }

    fn resolve_model(&self, _alias: &str) -> &'static str {
        "fake-model"
    }

    fn provider_id(&self) -> ProviderId {
        self.id
    }
}

/// Calls the page handler directly and records every action sent.
struct LocalBridge {
    page: Arc<Mutex<Page>>,
    actions: Mutex<Vec<PageAction>>,
}

#[async_trait::async_trait]
impl PageBridge for LocalBridge {
    async fn request(&self, operation_id: &str, action: PageAction) -> Result<PageReply> {
        let reply = self.page.lock().handle(operation_id, &action);
        self.actions.lock().push(action);
        Ok(reply)
    }
}

impl LocalBridge {
    fn action_names(&self) -> Vec<&'static str> {
        self.actions.lock().iter().map(PageAction::name).collect()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fixture
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const NOTE: &str = "\
S（主観的情報）
便通がすっきりしない
O（客観的情報）
センノシド追加
A（評価）
水分摂取を継続
P（計画）
- 次回体重を確認？
- 特になし
- 食事量は？";

struct Fixture {
    _dir: tempfile::TempDir,
    page: Arc<Mutex<Page>>,
    note: NodeHandle,
    followup: Option<NodeHandle>,
    bridge: LocalBridge,
    orchestrator: Orchestrator,
    provider: Arc<FakeProvider>,
}

struct Setup {
    layout: PageConfig,
    settings: &'static str,
    reply: FakeReply,
    target: bool,
    followup_field: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            layout: PageConfig::default(),
            settings: "provider = \"gemini\"\nmodel = \"gemini-flash\"\n[api_keys]\ngemini = \"AIza-test\"\n",
            reply: FakeReply::Note(NOTE),
            target: true,
            followup_field: true,
        }
    }
}

fn fixture(setup: Setup) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("settings.toml");
    std::fs::write(&settings_path, setup.settings).unwrap();

    let mut doc = Document::new();
    let note = doc.append(Element::textarea("soap").with_text("前回: 経過観察"));
    doc.append(
        Element::block("this-time")
            .with_text("オキシコドン徐放錠5mg\nセンノシド錠12mg 便秘時")
            .with_annotation("支B"),
    );
    doc.append(Element::block("left").with_text("前回処方: アムロジピン錠5mg\n支B 一包化"));
    let followup = setup
        .followup_field
        .then(|| doc.append(Element::textarea("followup")));

    let mut page = Page::new(doc, setup.layout.clone());
    if setup.target {
        assert!(page.context_menu(note));
    }
    page.begin_operation_with_id("op-1");
    let page = Arc::new(Mutex::new(page));

    let provider = FakeProvider::new(ProviderId::Gemini, setup.reply);
    let mut registry = ProviderRegistry::empty();
    registry.insert(provider.clone());

    let orchestrator = Orchestrator::new(
        setup.layout,
        Arc::new(registry),
        Arc::new(SettingsStore::new(settings_path)),
    );

    Fixture {
        _dir: dir,
        bridge: LocalBridge {
            page: page.clone(),
            actions: Mutex::new(Vec::new()),
        },
        page,
        note,
        followup,
        orchestrator,
        provider,
    }
}

impl Fixture {
    fn note_text(&self) -> String {
        self.page.lock().document().text_of(self.note).unwrap().to_string()
    }

    fn error_notification(&self) -> Option<String> {
        let page = self.page.lock();
        page.last_notification()
            .filter(|n| n.kind == NotificationKind::Error)
            .map(|n| n.message.clone())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Success path
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn full_operation_visits_every_state() {
    let fx = fixture(Setup::default());
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert!(summary.is_success(), "{:?}", summary.result);
    assert_eq!(
        summary.states,
        vec![
            OperationState::Idle,
            OperationState::FieldResolved,
            OperationState::ContextCaptured,
            OperationState::PromptBuilt,
            OperationState::AwaitingProvider,
            OperationState::ResponseReceived,
            OperationState::Injected,
            OperationState::Idle,
        ]
    );
    assert_eq!(fx.note_text(), NOTE);
    assert!(fx.page.lock().pending().is_none());
    assert!(fx.error_notification().is_none());
}

#[tokio::test]
async fn prompt_reflects_captured_context() {
    let fx = fixture(Setup::default());
    fx.orchestrator.run(&fx.bridge, "op-1").await;

    let prompts = fx.provider.prompts.lock();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];

    // 支B only appears as an annotation on the order block.
    assert!(prompt.contains(policy::PACKAGING_DISCLOSURE));
    assert!(!prompt.contains(policy::PACKAGING_PROHIBITION));
    // Opioid plus laxative.
    assert!(prompt.contains(policy::CONSTIPATION_SUB_POLICY));
    // Marker lines are stripped from prior visits.
    assert!(prompt.contains("前回処方: アムロジピン錠5mg"));
    assert!(!prompt.contains("支B 一包化"));
    assert!(prompt.ends_with("薬歴内容：\n前回: 経過観察"));
}

#[tokio::test]
async fn followup_questions_reach_secondary_field() {
    let fx = fixture(Setup::default());
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    let done = summary.result.unwrap();
    assert_eq!(done.followups, vec!["次回体重を確認？", "食事量は？"]);

    let followup = fx.followup.unwrap();
    assert_eq!(
        fx.page.lock().document().text_of(followup),
        Some("次回体重を確認？\n食事量は？")
    );
}

#[tokio::test]
async fn missing_followup_field_is_not_an_error() {
    let fx = fixture(Setup {
        followup_field: false,
        ..Setup::default()
    });
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;
    assert!(summary.is_success());
    assert!(fx.bridge.action_names().contains(&"set_followup_value"));
    assert!(fx.error_notification().is_none());
}

#[tokio::test]
async fn followup_capability_off_skips_step() {
    let mut layout = PageConfig::default();
    layout.capabilities.followup_extraction = false;
    let fx = fixture(Setup {
        layout,
        ..Setup::default()
    });
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert!(summary.result.unwrap().followups.is_empty());
    assert!(!fx.bridge.action_names().contains(&"set_followup_value"));
    assert_eq!(fx.page.lock().document().text_of(fx.followup.unwrap()), Some(""));
}

#[tokio::test]
async fn append_mode_keeps_existing_text() {
    let fx = fixture(Setup {
        layout: PageConfig {
            edit_mode: EditMode::AppendAfterExisting,
            ..PageConfig::default()
        },
        reply: FakeReply::Note("S: ..."),
        ..Setup::default()
    });
    fx.orchestrator.run(&fx.bridge, "op-1").await;
    assert_eq!(fx.note_text(), "前回: 経過観察\n\nS: ...");
}

#[tokio::test]
async fn actions_follow_protocol_order() {
    let fx = fixture(Setup::default());
    fx.orchestrator.run(&fx.bridge, "op-1").await;
    assert_eq!(
        fx.bridge.action_names(),
        vec![
            "get_field_context",
            "show_pending",
            "set_field_value",
            "set_followup_value",
            "hide_pending",
        ]
    );
}

#[tokio::test]
async fn retargeting_mid_operation_does_not_redirect_write() {
    let fx = fixture(Setup::default());
    let other = {
        let mut page = fx.page.lock();
        let other = page
            .document_mut()
            .append(Element::textarea("other").with_text("別の欄"));
        page.context_menu(other);
        other
    };

    fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert_eq!(fx.note_text(), NOTE);
    assert_eq!(fx.page.lock().document().text_of(other), Some("別の欄"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error paths
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn no_target_is_field_not_found() {
    let fx = fixture(Setup {
        target: false,
        ..Setup::default()
    });
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert!(matches!(summary.result, Err(Error::FieldNotFound)));
    assert_eq!(summary.states, vec![OperationState::Idle, OperationState::Idle]);
    assert_eq!(
        fx.error_notification().as_deref(),
        Some("テキストエリアの内容を取得できませんでした")
    );
    assert!(fx.provider.prompts.lock().is_empty());
    assert_eq!(fx.bridge.action_names(), vec!["get_field_context", "show_error"]);
}

#[tokio::test]
async fn missing_key_clears_indicator_and_explains() {
    // Assumes YK_CLAUDE_API_KEY is not set in the test environment.
    let fx = fixture(Setup {
        settings: "provider = \"claude\"\nmodel = \"claude-haiku\"\n",
        ..Setup::default()
    });
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert!(matches!(summary.result, Err(Error::MissingApiKey(ref p)) if p == "claude"));
    assert!(fx.page.lock().pending().is_none());
    assert!(fx.error_notification().unwrap().starts_with("APIキーが設定されていません"));
    assert_eq!(fx.note_text(), "前回: 経過観察");
    assert_eq!(
        fx.bridge.action_names(),
        vec!["get_field_context", "show_pending", "hide_pending", "show_error"]
    );
}

#[tokio::test]
async fn unknown_provider_is_reported() {
    let fx = fixture(Setup {
        settings: "provider = \"mistral\"\n",
        ..Setup::default()
    });
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert!(matches!(summary.result, Err(Error::UnknownProvider(ref p)) if p == "mistral"));
    assert_eq!(summary.error_message().as_deref(), Some("不明なプロバイダー: mistral"));
    assert!(fx.page.lock().pending().is_none());
    assert!(fx.provider.prompts.lock().is_empty());
}

#[tokio::test]
async fn provider_http_error_surfaces_status_and_body() {
    let fx = fixture(Setup {
        reply: FakeReply::Http(429, "{\"error\":\"quota exceeded\"}"),
        ..Setup::default()
    });
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert_eq!(
        summary.states,
        vec![
            OperationState::Idle,
            OperationState::FieldResolved,
            OperationState::ContextCaptured,
            OperationState::PromptBuilt,
            OperationState::AwaitingProvider,
            OperationState::Idle,
        ]
    );
    let message = fx.error_notification().unwrap();
    assert!(message.contains("429"));
    assert!(message.contains("quota exceeded"));
    assert!(fx.page.lock().pending().is_none());
    assert_eq!(fx.note_text(), "前回: 経過観察");
}

#[tokio::test]
async fn empty_response_is_distinct_error() {
    let fx = fixture(Setup {
        reply: FakeReply::Empty,
        ..Setup::default()
    });
    let summary = fx.orchestrator.run(&fx.bridge, "op-1").await;

    assert!(matches!(summary.result, Err(Error::EmptyResponse(_))));
    assert_eq!(
        fx.error_notification().as_deref(),
        Some("Geminiから有効な応答が得られませんでした")
    );
    assert!(fx.page.lock().pending().is_none());
}

#[tokio::test]
async fn pipeline_is_reentrant_after_failure() {
    let fx = fixture(Setup {
        target: false,
        ..Setup::default()
    });
    assert!(!fx.orchestrator.run(&fx.bridge, "op-1").await.is_success());

    {
        let mut page = fx.page.lock();
        page.context_menu(fx.note);
        page.begin_operation_with_id("op-2");
    }
    assert!(fx.orchestrator.run(&fx.bridge, "op-2").await.is_success());
    assert_eq!(fx.note_text(), NOTE);
}
