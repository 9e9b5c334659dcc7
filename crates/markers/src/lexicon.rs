//! Drug-class lexicon used to profile the current order.
//!
//! Only the classes that switch prompt policy locally are listed; every
//! other order classification (oral/topical/patch) is delegated to the model.

use serde::Serialize;

use crate::normalize::{tokenize, Pattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrugClass {
    /// Oral drugs with constipation as a known side effect: anticholinergics,
    /// opioids, calcium-channel blockers, iron preparations.
    ConstipationRisk,
    Laxative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconEntry {
    pub class: DrugClass,
    pub name: &'static str,
}

const fn entry(class: DrugClass, name: &'static str) -> LexiconEntry {
    LexiconEntry { class, name }
}

use DrugClass::{ConstipationRisk, Laxative};

pub const DRUG_LEXICON: &[LexiconEntry] = &[
    // Calcium-channel blockers
    entry(ConstipationRisk, "アムロジピン"),
    entry(ConstipationRisk, "ノルバスク"),
    entry(ConstipationRisk, "アムロジン"),
    entry(ConstipationRisk, "ニフェジピン"),
    entry(ConstipationRisk, "アダラート"),
    entry(ConstipationRisk, "ベラパミル"),
    entry(ConstipationRisk, "ワソラン"),
    entry(ConstipationRisk, "ジルチアゼム"),
    entry(ConstipationRisk, "ヘルベッサー"),
    entry(ConstipationRisk, "シルニジピン"),
    entry(ConstipationRisk, "アゼルニジピン"),
    // Opioids
    entry(ConstipationRisk, "オキシコドン"),
    entry(ConstipationRisk, "オキシコンチン"),
    entry(ConstipationRisk, "モルヒネ"),
    entry(ConstipationRisk, "フェンタニル"),
    entry(ConstipationRisk, "トラマドール"),
    entry(ConstipationRisk, "トラムセット"),
    entry(ConstipationRisk, "コデイン"),
    entry(ConstipationRisk, "タペンタドール"),
    entry(ConstipationRisk, "ヒドロモルフォン"),
    // Anticholinergics
    entry(ConstipationRisk, "ブチルスコポラミン"),
    entry(ConstipationRisk, "ブスコパン"),
    entry(ConstipationRisk, "トリヘキシフェニジル"),
    entry(ConstipationRisk, "オキシブチニン"),
    entry(ConstipationRisk, "ソリフェナシン"),
    entry(ConstipationRisk, "ベシケア"),
    entry(ConstipationRisk, "イミダフェナシン"),
    entry(ConstipationRisk, "フェソテロジン"),
    entry(ConstipationRisk, "プロピベリン"),
    entry(ConstipationRisk, "バップフォー"),
    // Iron preparations
    entry(ConstipationRisk, "クエン酸第一鉄"),
    entry(ConstipationRisk, "フェロミア"),
    entry(ConstipationRisk, "フマル酸第一鉄"),
    entry(ConstipationRisk, "フェルム"),
    entry(ConstipationRisk, "硫酸鉄"),
    entry(ConstipationRisk, "フェロ・グラデュメット"),
    // Laxatives
    entry(Laxative, "センノシド"),
    entry(Laxative, "プルゼニド"),
    entry(Laxative, "センナ"),
    entry(Laxative, "酸化マグネシウム"),
    entry(Laxative, "マグミット"),
    entry(Laxative, "ピコスルファート"),
    entry(Laxative, "ラキソベロン"),
    entry(Laxative, "テレミンソフト"),
    entry(Laxative, "ビサコジル"),
    entry(Laxative, "ルビプロストン"),
    entry(Laxative, "アミティーザ"),
    entry(Laxative, "リナクロチド"),
    entry(Laxative, "リンゼス"),
    entry(Laxative, "エロビキシバット"),
    entry(Laxative, "グーフィス"),
    entry(Laxative, "ラクツロース"),
    entry(Laxative, "モビコール"),
    entry(Laxative, "大黄甘草湯"),
    entry(Laxative, "新レシカルボン"),
];

/// Which drug classes an order mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderProfile {
    pub constipation_risk: bool,
    pub laxative: bool,
}

impl OrderProfile {
    /// Both a constipation-risk drug and a laxative are ordered together.
    pub fn needs_constipation_policy(&self) -> bool {
        self.constipation_risk && self.laxative
    }
}

/// Profile `order_text` against [`DRUG_LEXICON`].
pub fn classify_order(order_text: &str) -> OrderProfile {
    let tokens = tokenize(order_text);
    DRUG_LEXICON
        .iter()
        .filter(|e| Pattern::compile(e.name).is_found_in(&tokens))
        .fold(OrderProfile::default(), |mut acc, e| {
            match e.class {
                ConstipationRisk => acc.constipation_risk = true,
                Laxative => acc.laxative = true,
            }
            acc
        })
}
