//! The framework's feature highlights, rendered as the landing-page block of the docs
//! site.
use std::fmt::Write;

use crate::html::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        title: "Rapid delivery",
        icon: "⏱️",
        description: "Full REST API wrapper for a SQL table in 5 minutes? No problem. \
                      Need customization? We got you covered.",
    },
    Feature {
        title: "Concise and ellegant",
        icon: "👔",
        description: "Hate code generation? So do we. Gin REST Framework uses generics \
                      to provide a concise and ellegant API.",
    },
    Feature {
        title: "It's Just a library",
        icon: "🧩",
        description: "GRF doesn't enforce any file structure or project layout, you can \
                      freely use it with your existing Gin project. Did I mention it's \
                      using GORM?",
    },
];

/// One `col col--4` cell per feature, in order.
pub fn render(features: &[Feature]) -> String {
    let mut html = String::new();
    html.push_str("<section class=\"features\">\n");
    html.push_str("  <div class=\"container\">\n");
    html.push_str("    <div class=\"row\">\n");
    for feature in features {
        // writing into a String cannot fail
        let _ = write!(
            html,
            concat!(
                "      <div class=\"col col--4\">\n",
                "        <div class=\"text--center\"></div>\n",
                "        <div class=\"text--center padding-horiz--md\">\n",
                "          <h3>{} {}</h3>\n",
                "          <p>{}</p>\n",
                "        </div>\n",
                "      </div>\n",
            ),
            escape(feature.title),
            escape(feature.icon),
            escape(feature.description),
        );
    }
    html.push_str("    </div>\n");
    html.push_str("  </div>\n");
    html.push_str("</section>\n");
    html
}
