//! カードIDと剛体ハンドルの対応表
//!
//! ウォールのインスタンスが所有し、各サブコンポーネントには参照で渡されます。
//! 1枚のカードにつきボディは高々1つ、ボディが複数のカードで共有されることはありません。

use std::collections::HashMap;

use rapier2d::prelude::RigidBodyHandle;

/// ボディレジストリ
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: HashMap<String, RigidBodyHandle>,
    /// 登録順（同期処理の順序を安定させるため）
    order: Vec<String>,
}

impl BodyRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// カードが登録済みか
    pub fn contains(&self, card_id: &str) -> bool {
        self.bodies.contains_key(card_id)
    }

    /// カードのボディを取得
    pub fn get(&self, card_id: &str) -> Option<RigidBodyHandle> {
        self.bodies.get(card_id).copied()
    }

    /// カードを登録
    ///
    /// 既に登録済みの場合は何もせず`false`を返します。
    pub fn insert(&mut self, card_id: &str, handle: RigidBodyHandle) -> bool {
        if self.contains(card_id) {
            return false;
        }
        self.bodies.insert(card_id.to_string(), handle);
        self.order.push(card_id.to_string());
        true
    }

    /// カードの登録を解除
    pub fn remove(&mut self, card_id: &str) -> Option<RigidBodyHandle> {
        let handle = self.bodies.remove(card_id)?;
        self.order.retain(|id| id != card_id);
        Some(handle)
    }

    /// 登録順に (カードID, ハンドル) を列挙
    pub fn iter(&self) -> impl Iterator<Item = (&str, RigidBodyHandle)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.bodies.get(id).map(|handle| (id.as_str(), *handle)))
    }

    /// 登録数
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// すべての登録を解除
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.order.clear();
    }
}
