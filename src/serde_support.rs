use crate::fen;
use crate::game::Position;
use crate::r#move::Move;
use crate::state::BoardState;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize Position as FEN string. History is not carried.
impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&fen::print(self))
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        fen::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl Serialize for BoardState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_fen())
    }
}

impl<'de> Deserialize<'de> for BoardState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        BoardState::from_fen(&text).map_err(serde::de::Error::custom)
    }
}

/// Serialize Move as UCI string
impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_lan())
    }
}

/// Deserialize Move from any coordinate form `Move::parse` accepts
impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Move::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{DrawReason, MoveOutcome};
    use crate::pieces::PieceType;
    use crate::square::*;

    #[test]
    fn test_position_serde() {
        let position = Position::starting()
            .make_move("e4")
            .expect("legal move");

        let json = serde_json::to_string(&position).expect("serializes");
        assert_eq!(
            json,
            "\"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1\""
        );

        let back: Position = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back.to_fen(), position.to_fen());
    }

    #[test]
    fn test_position_serde_rejects_bad_fen() {
        let result: Result<Position, _> = serde_json::from_str("\"8/8/8 w - - 0 1\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_state_serde() {
        let state = BoardState::starting();
        let json = serde_json::to_string(&state).expect("serializes");
        let back: BoardState = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, state);
    }

    #[test]
    fn test_move_serde() {
        let mv = Move::with_promotion(B7, B8, PieceType::Queen);
        let json = serde_json::to_string(&mv).expect("serializes");
        assert_eq!(json, "\"b7b8q\"");

        let back: Move = serde_json::from_str("\"b7-b8=Q\"").expect("deserializes");
        assert_eq!(back, mv);
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_string(&MoveOutcome::Draw(DrawReason::FiftyMoveRule))
            .expect("serializes");
        let back: MoveOutcome = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, MoveOutcome::Draw(DrawReason::FiftyMoveRule));
    }
}
