//! The card template: date and title on top, a mark and an attribution in
//! the footer.

use crate::{
    config::DEFAULT_ATTRIBUTION,
    fonts::Weight,
    layout::{Align, Direction, Graphic, Justify, Node, Style},
};

const BACKGROUND: &str = "#1d1f21";
const FOREGROUND: &str = "#c9cacc";
const ACCENT: &str = "#2bbc89";
const TITLE: &str = "#ffffff";

/// The "ER" monogram: an orange E and a green R.
const MARK: &str = concat!(
    r##"<path d="M 43.844284,1.1901855e-6 H 1.1138916e-6 V 72.70253 H 45.261882 V 59.84289 H 12.150842 V 41.009088 H 41.312859 V 28.149448 H 12.150842 V 12.859641 h 31.693442 z" fill="#ff7f2a"/>"##,
    r##"<path d="m 55.387674,72.70253 h 12.15084 V 44.350569 h 12.859639 c 8.404332,0.202514 9.82193,2.328911 9.720673,13.770952 0.101257,6.885477 0.405028,10.429472 1.417598,14.581009 h 13.770956 v -1.923883 c -2.1264,-1.01257 -2.53143,-2.632682 -2.63269,-9.011874 0.10126,-17.011176 -0.91131,-20.352657 -7.594271,-23.896652 6.075421,-3.037711 9.214391,-8.80936 9.214391,-17.213691 C 104.29481,8.1005615 96.903045,1.1901855e-6 85.461004,1.1901855e-6 H 55.387674 Z M 67.538514,31.997214 V 12.454613 h 15.593579 c 5.670392,0 8.708102,3.442738 8.708102,9.821929 0,6.682962 -3.03771,9.720672 -9.619415,9.720672 z" fill="#53c68c"/>"##,
);

const MARK_VIEW_BOX: (f32, f32) = (105.38852, 72.646561);

/// Whatever fits between the date and the footer at the title's size.
const TITLE_MAX_LINES: usize = 6;

#[derive(Debug, Clone)]
pub struct Template {
    pub attribution: String,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

impl Template {
    /// Builds the card's layout tree. `title` and `date` end up as plain text
    /// nodes and are never interpreted as markup.
    pub fn build(&self, title: &str, date: &str) -> Node {
        let content = Node::container(
            Style {
                direction: Direction::Column,
                grow: 1.0,
                padding: 40.0,
                justify: Justify::Center,
                ..Style::default()
            },
            vec![
                Node::text(
                    Style {
                        font_size: Some(24.0),
                        line_height: Some(32.0 / 24.0),
                        margin_bottom: 24.0,
                        ..Style::default()
                    },
                    date,
                ),
                Node::text(
                    Style {
                        font_size: Some(36.0),
                        line_height: Some(1.375),
                        weight: Some(Weight::Bold),
                        color: Some(TITLE),
                        line_clamp: Some(TITLE_MAX_LINES),
                        ..Style::default()
                    },
                    title,
                ),
            ],
        );

        let footer = Node::container(
            Style {
                direction: Direction::Row,
                padding: 40.0,
                justify: Justify::SpaceBetween,
                align: Align::Center,
                border_top: Some((1.0, ACCENT)),
                font_size: Some(20.0),
                line_height: Some(28.0 / 20.0),
                ..Style::default()
            },
            vec![
                Node::graphic(
                    Style::default(),
                    Graphic {
                        width: 100.0,
                        height: 68.75,
                        view_box: MARK_VIEW_BOX,
                        body: MARK,
                    },
                ),
                Node::text(Style::default(), self.attribution.as_str()),
            ],
        );

        Node::container(
            Style {
                direction: Direction::Column,
                background: Some(BACKGROUND),
                color: Some(FOREGROUND),
                ..Style::default()
            },
            vec![content, footer],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_nodes_hold_the_literal_inputs() {
        let root = Template::default().build("Hello World", "Monday, January 1");
        assert_eq!(
            root.texts(),
            ["Monday, January 1", "Hello World", DEFAULT_ATTRIBUTION]
        );
    }

    #[test]
    fn markup_in_titles_stays_text() {
        let title = r#"<div tw="hidden">Tom & "Jerry"</div>"#;
        let root = Template::default().build(title, "Friday, May 3");
        assert_eq!(root.texts()[1], title);
    }

    #[test]
    fn attribution_comes_from_the_template() {
        let template = Template {
            attribution: "by Someone Else".to_string(),
        };
        let root = template.build("T", "D");
        assert_eq!(root.texts().last(), Some(&"by Someone Else"));
    }

    #[test]
    fn frame_is_dark_with_accented_footer() {
        let root = Template::default().build("T", "D");
        assert_eq!(root.style.background, Some(BACKGROUND));

        let crate::layout::Content::Children(rows) = &root.content else {
            panic!("frame should have rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].style.grow, 1.0);
        assert_eq!(rows[1].style.border_top, Some((1.0, ACCENT)));
    }

    #[test]
    fn footer_starts_with_the_monogram() {
        let root = Template::default().build("T", "D");
        let crate::layout::Content::Children(rows) = &root.content else {
            panic!("frame should have rows");
        };
        let crate::layout::Content::Children(footer) = &rows[1].content else {
            panic!("footer should have children");
        };
        let crate::layout::Content::Graphic(mark) = &footer[0].content else {
            panic!("footer should start with the mark");
        };

        assert_eq!((mark.width, mark.height), (100.0, 68.75));
        assert_eq!(mark.view_box, (105.38852, 72.646561));
        assert_eq!(mark.body.matches("<path ").count(), 2);
        assert!(mark.body.contains(r##"fill="#ff7f2a""##));
        assert!(mark.body.contains(r##"fill="#53c68c""##));
    }
}
