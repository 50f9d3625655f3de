//! Block catalog: the closed set of block types and their default props.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::DocumentError;

/// Type-specific attribute bag of a block
pub type Props = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Container,
    Text,
    Image,
    Button,
    Divider,
    Spacer,
    Video,
    Product,
    SocialShare,
    SocialFollow,
    ReadMore,
    DataTable,
    Event,
    Feedback,
    Rsvp,
}

impl BlockType {
    pub const ALL: [BlockType; 15] = [
        BlockType::Container,
        BlockType::Text,
        BlockType::Image,
        BlockType::Button,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Video,
        BlockType::Product,
        BlockType::SocialShare,
        BlockType::SocialFollow,
        BlockType::ReadMore,
        BlockType::DataTable,
        BlockType::Event,
        BlockType::Feedback,
        BlockType::Rsvp,
    ];

    /// Wire name, as used in the persisted JSON
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Container => "container",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Button => "button",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Video => "video",
            BlockType::Product => "product",
            BlockType::SocialShare => "social-share",
            BlockType::SocialFollow => "social-follow",
            BlockType::ReadMore => "read-more",
            BlockType::DataTable => "data-table",
            BlockType::Event => "event",
            BlockType::Feedback => "feedback",
            BlockType::Rsvp => "rsvp",
        }
    }

    /// Containers are the only blocks that nest other blocks
    pub fn is_container(self) -> bool {
        matches!(self, BlockType::Container)
    }

    /// Props a freshly added block of this type starts with
    pub fn default_props(self) -> Props {
        let value = match self {
            BlockType::Container => json!({
                "backgroundColor": "transparent",
                "padding": 16,
                "borderRadius": 0,
            }),
            BlockType::Text => json!({
                "content": "New text block",
                "fontSize": 16,
                "color": "#333333",
                "textAlign": "left",
                "fontWeight": "normal",
            }),
            BlockType::Image => json!({
                "src": "https://via.placeholder.com/600x300",
                "alt": "Image",
                "width": "100%",
                "align": "center",
                "link": "",
            }),
            BlockType::Button => json!({
                "text": "Click Here",
                "url": "#",
                "backgroundColor": "#007bff",
                "textColor": "#ffffff",
                "borderRadius": 4,
                "align": "center",
                "padding": "12px 24px",
            }),
            BlockType::Divider => json!({
                "color": "#dddddd",
                "thickness": 1,
                "style": "solid",
                "margin": 16,
            }),
            BlockType::Spacer => json!({ "height": 32 }),
            BlockType::Video => json!({
                "url": "",
                "thumbnailUrl": "",
                "alt": "Video",
            }),
            BlockType::Product => json!({
                "name": "Product Name",
                "price": "$0.00",
                "imageUrl": "",
                "description": "",
                "buttonText": "Buy Now",
                "buttonUrl": "#",
            }),
            BlockType::SocialShare => json!({
                "platforms": ["facebook", "twitter", "linkedin"],
                "align": "center",
                "iconSize": 32,
            }),
            BlockType::SocialFollow => json!({
                "links": { "facebook": "", "instagram": "", "twitter": "" },
                "align": "center",
                "iconSize": 32,
            }),
            BlockType::ReadMore => json!({
                "text": "Read more",
                "url": "#",
                "previewText": "",
            }),
            BlockType::DataTable => json!({
                "headers": ["Column 1", "Column 2"],
                "rows": [["", ""]],
                "striped": true,
            }),
            BlockType::Event => json!({
                "title": "Event Title",
                "date": "",
                "time": "",
                "location": "",
                "description": "",
            }),
            BlockType::Feedback => json!({
                "question": "How would you rate this email?",
                "scale": 5,
                "style": "stars",
            }),
            BlockType::Rsvp => json!({
                "question": "Will you attend?",
                "yesText": "Yes",
                "noText": "No",
                "maybeText": "Maybe",
                "responseUrl": "#",
            }),
        };

        match value {
            Value::Object(map) => map,
            _ => Props::new(),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DocumentError::UnknownBlockType(s.to_string()))
    }
}
