//! Category and tag records.

use serde::{Deserialize, Serialize};

use rswp_storage::Term;

/// A category term with its hierarchy link resolved.
///
/// The link is the slash-joined slug path from the root ancestor down to
/// this category, for example `/category/news/tech`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(flatten)]
    pub term: Term,
    pub link: String,
}

impl Category {
    /// Builds the category from its term row and the slugs of its
    /// ancestors, root first.
    pub fn assemble(term: Term, ancestor_slugs: &[String]) -> Self {
        let mut link = String::from("/category");
        for slug in ancestor_slugs {
            link.push('/');
            link.push_str(slug);
        }
        link.push('/');
        link.push_str(&term.slug);

        Self { term, link }
    }

    /// Builds the category from its term row and its parent's resolved
    /// link.
    pub fn assemble_under(term: Term, parent_link: &str) -> Self {
        let link = format!("{}/{}", parent_link, term.slug);
        Self { term, link }
    }
}

/// A tag term. Tags are flat, so the link is a single path segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(flatten)]
    pub term: Term,
    pub link: String,
}

impl Tag {
    pub fn assemble(term: Term) -> Self {
        let link = format!("/tag/{}", term.slug);
        Self { term, link }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rswp_storage::Taxonomy;

    fn term(id: i64, slug: &str, taxonomy: Taxonomy, parent: i64) -> Term {
        Term {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
            group: 0,
            taxonomy_id: id,
            taxonomy,
            description: String::new(),
            parent,
            count: 0,
        }
    }

    #[test]
    fn test_root_category_link() {
        let category = Category::assemble(term(1, "news", Taxonomy::Category, 0), &[]);
        assert_eq!(category.link, "/category/news");
    }

    #[test]
    fn test_nested_category_link_includes_ancestors() {
        let category = Category::assemble(
            term(2, "tech", Taxonomy::Category, 1),
            &["news".to_string()],
        );
        assert_eq!(category.link, "/category/news/tech");
    }

    #[test]
    fn test_category_link_extends_parent_link() {
        let category =
            Category::assemble_under(term(2, "tech", Taxonomy::Category, 1), "/category/news");
        assert_eq!(category.link, "/category/news/tech");
    }

    #[test]
    fn test_tag_link() {
        let tag = Tag::assemble(term(3, "rust", Taxonomy::PostTag, 0));
        assert_eq!(tag.link, "/tag/rust");
    }

    #[test]
    fn test_category_round_trips_through_json() {
        let category = Category::assemble(
            term(2, "tech", Taxonomy::Category, 1),
            &["news".to_string()],
        );
        let blob = serde_json::to_string(&category).expect("encode");
        let decoded: Category = serde_json::from_str(&blob).expect("decode");
        assert_eq!(decoded, category);
    }
}
