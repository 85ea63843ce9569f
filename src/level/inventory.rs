use super::Level;
use crate::battle::CombatantId;
use crate::entity::item::{ItemId, ItemKey, ItemKind};
use crate::error::LevelError;

impl Level {
    /// Moves a ground item into `who`'s inventory. Only the stack under
    /// `who` is in reach.
    pub fn move_item(&mut self, key: ItemKey, who: CombatantId) -> Result<(), LevelError> {
        let here = self
            .character(who)
            .ok_or(LevelError::UnknownCombatant)?
            .pos();
        if key.pos != here {
            return Err(LevelError::NotStandingOn { pos: key.pos });
        }
        let missing = LevelError::ItemNotOnGround {
            item: key.id,
            pos: key.pos,
        };
        let Some(stack) = self.items.get_mut(&key.pos) else {
            return Err(missing);
        };
        let Some(idx) = stack.iter().position(|item| item.id == key.id) else {
            return Err(missing);
        };
        let item = stack.remove(idx);
        if stack.is_empty() {
            self.items.remove(&key.pos);
        }

        let item_name = item.name().to_string();
        let character = self
            .character_mut(who)
            .ok_or(LevelError::UnknownCombatant)?;
        character.items.push(item);
        let line = format!("{} picked up 1x {item_name}", character.name());
        self.add_event(line);
        Ok(())
    }

    /// Puts an inventory item on the ground under `who`, unequipping it first.
    pub fn drop_item(&mut self, id: ItemId, who: CombatantId) -> Result<(), LevelError> {
        let character = self
            .character_mut(who)
            .ok_or(LevelError::UnknownCombatant)?;
        let mut item = character
            .take_item(id)
            .ok_or(LevelError::ItemNotInInventory { item: id })?;
        let pos = character.pos();
        let line = format!("{} dropped 1x {}", character.name(), item.name());

        item.entity.pos = pos;
        self.items.entry(pos).or_default().push(item);
        self.add_event(line);
        Ok(())
    }

    pub fn equip(&mut self, id: ItemId, who: CombatantId) -> Result<ItemKind, LevelError> {
        self.character_mut(who)
            .ok_or(LevelError::UnknownCombatant)?
            .equip(id)
    }
}
