use std::sync::OnceLock;

use crate::models::SectionKind;

pub const MEDIA_FIELDS: &str =
    "fragment MediaFields on MediaItem { sourceUrl altText mediaDetails { width height } }";

pub const LINK_FIELDS: &str = "fragment LinkFields on AcfLink { url title target }";

const CONTENT_FIELDS: &str = "databaseId title slug uri date excerpt content \
    featuredImage { node { ...MediaFields } }";

pub const LOGIN_MUTATION: &str = r#"
mutation Login($username: String!, $password: String!) {
  login(input: { clientMutationId: "pressx", username: $username, password: $password }) {
    authToken
    user { databaseId name email }
  }
}"#;

pub const HOMEPAGE_SETTINGS_QUERY: &str = r#"
query HomepageSettings {
  homepageSettings { frontPage { databaseId } }
}"#;

pub const LANDINGS_QUERY: &str = r#"
query Landings {
  landings(first: 100) { nodes { databaseId title slug uri } }
}"#;

pub const MENU_ITEMS_QUERY: &str = r#"
query MenuItems($location: MenuLocationEnum!) {
  menuItems(where: { location: $location }, first: 100) {
    nodes { id parentId label url path target }
  }
}"#;

pub const MENU_QUERY: &str = r#"
query Menu($id: ID!) {
  menu(id: $id, idType: NAME) {
    menuItems(first: 100) { nodes { id parentId label url path target } }
  }
}"#;

/// The combined `Sections` fragment plus every per-kind fragment it spreads.
pub fn sections_fragment() -> &'static str {
    static SECTIONS: OnceLock<String> = OnceLock::new();

    SECTIONS.get_or_init(|| {
        let spreads: Vec<String> = SectionKind::ALL
            .iter()
            .map(|kind| format!("...{}", kind.fragment_name()))
            .collect();

        let mut doc = format!(
            "fragment Sections on LandingSection {{ type {} }}",
            spreads.join(" ")
        );
        for kind in SectionKind::ALL {
            doc.push('\n');
            doc.push_str(&kind.fragment());
        }
        doc.push('\n');
        doc.push_str(MEDIA_FIELDS);
        doc.push('\n');
        doc.push_str(LINK_FIELDS);
        doc
    })
}

pub fn post_query() -> &'static str {
    static QUERY: OnceLock<String> = OnceLock::new();

    QUERY.get_or_init(|| {
        format!(
            "query Post($id: ID!, $idType: PostIdType) {{ post(id: $id, idType: $idType) {{ {CONTENT_FIELDS} }} }}\n{MEDIA_FIELDS}"
        )
    })
}

pub fn page_query() -> &'static str {
    static QUERY: OnceLock<String> = OnceLock::new();

    QUERY.get_or_init(|| {
        format!(
            "query Page($id: ID!, $idType: PageIdType) {{ page(id: $id, idType: $idType) {{ {CONTENT_FIELDS} }} }}\n{MEDIA_FIELDS}"
        )
    })
}

pub fn recent_posts_query() -> &'static str {
    static QUERY: OnceLock<String> = OnceLock::new();

    QUERY.get_or_init(|| {
        format!(
            "query RecentPosts($first: Int!) {{ posts(first: $first) {{ nodes {{ {CONTENT_FIELDS} }} }} }}\n{MEDIA_FIELDS}"
        )
    })
}

pub fn landing_query() -> &'static str {
    static QUERY: OnceLock<String> = OnceLock::new();

    QUERY.get_or_init(|| {
        format!(
            "query Landing($id: ID!, $idType: LandingIdType) {{ landing(id: $id, idType: $idType) {{ databaseId title slug uri sections {{ ...Sections }} }} }}\n{}",
            sections_fragment()
        )
    })
}
