mod deal;
mod record;
mod tokens;

pub use deal::{
    format_deal_tag, format_hand, format_hands, parse_deal_tag, parse_hands, ParseError, PbnDeal,
};
pub use record::{format_play_record, PlayRecord};
pub use tokens::{parse_card, parse_cards, parse_denomination, parse_position};
