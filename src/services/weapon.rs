use serde_json::Value;
use tracing::info;

use crate::clock::Clock;
use crate::constants::WEAPON_MAX_TOKENS;
use crate::error::Result;
use crate::models::prompt::GenerationPrompt;
use crate::models::weapon::{default_icon, Rarity, WeaponDescriptor, WeaponKind, WeaponRequest};
use crate::services::generation::{generate_with_fallback, ClampRule, TextGenerator};

pub const WEAPON_RULES: [ClampRule; 4] = [
    ClampRule::integer("damage", 15.0, 100.0, 20.0),
    ClampRule::integer("cooldown", 200.0, 3000.0, 500.0),
    ClampRule::integer("energy", 0.0, 30.0, 0.0),
    ClampRule::integer("price", 100.0, 5000.0, 500.0),
];

/// Normalized generation input. Nothing here is ever rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponContext {
    pub owned_weapons: Vec<Value>,
    pub player_level: u32,
    pub preferred_type: String,
}

impl Default for WeaponContext {
    fn default() -> Self {
        Self {
            owned_weapons: Vec::new(),
            player_level: 1,
            preferred_type: "any".into(),
        }
    }
}

impl From<WeaponRequest> for WeaponContext {
    fn from(req: WeaponRequest) -> Self {
        let defaults = Self::default();
        Self {
            owned_weapons: match req.owned_weapons {
                Some(Value::Array(items)) => items,
                _ => defaults.owned_weapons,
            },
            player_level: req
                .player_level
                .as_ref()
                .and_then(Value::as_f64)
                .filter(|l| l.is_finite() && *l >= 1.0)
                .map(|l| l.min(u32::MAX as f64).floor() as u32)
                .unwrap_or(defaults.player_level),
            preferred_type: req
                .preferred_type
                .as_ref()
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.preferred_type),
        }
    }
}

impl WeaponContext {
    /// Lenient body parsing: an empty or malformed body means "all defaults".
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        match serde_json::from_slice::<WeaponRequest>(body) {
            Ok(req) => req.into(),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable generate-item body, using defaults");
                Self::default()
            }
        }
    }
}

pub fn weapon_prompt(ctx: &WeaponContext) -> GenerationPrompt {
    let owned = serde_json::to_string(&ctx.owned_weapons).unwrap_or_else(|_| "[]".into());
    GenerationPrompt {
        system: "You are a game designer creating unique weapons for ShatterRealms, a fantasy combat game.".into(),
        user: format!(
            "The player already owns these weapons: {owned}
Player level/progress: {level}
Preferred weapon type (optional): {preferred}

Create a NEW unique weapon that doesn't exist yet. Be creative with fantasy/sci-fi themes.

Weapon types available: weapon (melee), ranged, ability

Respond with ONLY a JSON object in this exact format:
{{
    \"id\": \"unique_snake_case_id\",
    \"name\": \"Display Name\",
    \"icon\": \"single emoji\",
    \"type\": \"weapon|ranged|ability\",
    \"damage\": 15-100,
    \"cooldown\": 200-3000,
    \"energy\": 0-30,
    \"desc\": \"Short description under 50 chars\",
    \"price\": 100-5000,
    \"rarity\": \"common|uncommon|rare|epic|legendary\",
    \"special\": \"optional special effect description\"
}}

Make it balanced but interesting. Higher rarity = higher stats and price.",
            level = ctx.player_level,
            preferred = ctx.preferred_type,
        ),
        max_tokens: WEAPON_MAX_TOKENS,
        temperature: 0.9,
    }
}

pub fn fallback_weapon(now_millis: u64) -> WeaponDescriptor {
    WeaponDescriptor {
        id: format!("mystery_blade_{now_millis}"),
        name: "Mystery Blade".into(),
        icon: default_icon(),
        kind: WeaponKind::Weapon,
        damage: 25,
        cooldown: 500,
        energy: 0,
        desc: "A blade shrouded in mystery".into(),
        price: 500,
        rarity: Rarity::Uncommon,
        special: Some("Randomly generated".into()),
    }
}

pub async fn generate_weapon(
    generator: &dyn TextGenerator,
    clock: &dyn Clock,
    ctx: &WeaponContext,
) -> Result<WeaponDescriptor> {
    let mut weapon = generate_with_fallback(
        generator,
        &weapon_prompt(ctx),
        &WEAPON_RULES,
        || fallback_weapon(clock.now_millis()),
    )
    .await?;

    if weapon.id.trim().is_empty() {
        weapon.id = format!("generated_{}", clock.now_millis());
    }
    info!(
        id = %weapon.id,
        rarity = ?weapon.rarity,
        level = ctx.player_level,
        "weapon generated"
    );
    Ok(weapon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generation::sanitize;
    use serde_json::json;

    #[test]
    fn empty_body_gives_defaults() {
        assert_eq!(WeaponContext::from_body(b""), WeaponContext::default());
        assert_eq!(WeaponContext::from_body(b"  \n"), WeaponContext::default());
        assert_eq!(WeaponContext::from_body(b"{oops"), WeaponContext::default());
    }

    #[test]
    fn fields_are_normalized() {
        let body = json!({
            "ownedWeapons": ["sword", {"id": "bow"}],
            "playerLevel": 7.8,
            "preferredType": " ranged "
        });
        let ctx = WeaponContext::from_body(body.to_string().as_bytes());
        assert_eq!(ctx.owned_weapons.len(), 2);
        assert_eq!(ctx.player_level, 7);
        assert_eq!(ctx.preferred_type, "ranged");
    }

    #[test]
    fn wrongly_typed_fields_fall_back_individually() {
        let body = json!({
            "ownedWeapons": "sword",
            "playerLevel": 0,
            "preferredType": 42
        });
        let ctx = WeaponContext::from_body(body.to_string().as_bytes());
        assert_eq!(ctx, WeaponContext::default());
    }

    #[test]
    fn prompt_embeds_context() {
        let ctx = WeaponContext {
            owned_weapons: vec![json!("frost_bow")],
            player_level: 12,
            preferred_type: "ability".into(),
        };
        let prompt = weapon_prompt(&ctx);
        assert!(prompt.user.contains(r#"["frost_bow"]"#));
        assert!(prompt.user.contains("Player level/progress: 12"));
        assert!(prompt.user.contains("Preferred weapon type (optional): ability"));
        assert_eq!(prompt.max_tokens, WEAPON_MAX_TOKENS);
    }

    #[test]
    fn fallback_is_within_ranges() {
        let weapon = fallback_weapon(1_700_000_000_000);
        assert_eq!(weapon.id, "mystery_blade_1700000000000");
        assert_eq!(sanitize(weapon.clone(), &WEAPON_RULES), weapon);
    }
}
