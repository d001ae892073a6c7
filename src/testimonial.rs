//! テスティモニアル（カードの表示内容）
//!
//! 物理側はIDだけを参照し、表示内容は読み取り専用でレンダリング層に渡されます。

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::WallResult;

/// 1件のテスティモニアル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    /// カードID
    pub id: String,
    /// 投稿者名
    pub author_name: String,
    /// 投稿者の肩書き
    #[serde(default)]
    pub author_title: Option<String>,
    /// アバター画像のURL
    #[serde(default)]
    pub author_avatar: Option<String>,
    /// 本文
    pub text: String,
    /// 評価（1〜5）
    #[serde(default)]
    pub rating: Option<u8>,
}

impl Testimonial {
    /// 表示用の評価（1〜5に丸める）
    pub fn clamped_rating(&self) -> Option<u8> {
        self.rating.map(|r| r.clamp(1, 5))
    }

    /// カード要素のDOM ID
    pub fn element_id(&self, wall_id: &str) -> String {
        card_element_id(wall_id, &self.id)
    }
}

/// ウォールIDとカードIDからDOM IDを組み立てる
pub fn card_element_id(wall_id: &str, card_id: &str) -> String {
    format!("{}-card-{}", wall_id, card_id)
}

/// JSON配列からテスティモニアルを読み込む
pub fn parse_testimonials(json: &str) -> WallResult<Vec<Testimonial>> {
    Ok(serde_json::from_str(json)?)
}

/// 重複したIDを取り除く（最初の1件を残す）
///
/// カード要素のDOM IDとボディはカードIDごとに1つなので、重複は描画前に落とします。
pub fn dedup_by_id(testimonials: Vec<Testimonial>) -> Vec<Testimonial> {
    let mut seen = HashSet::new();
    testimonials
        .into_iter()
        .filter(|t| {
            let fresh = seen.insert(t.id.clone());
            if !fresh {
                log::warn!("重複したテスティモニアルIDを無視しました: {}", t.id);
            }
            fresh
        })
        .collect()
}
