//! Search links on external course platforms
//!
//! Offered next to generated content for learners who prefer a full course.

use reqwest::Url;

/// An external learning platform and its search endpoint
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub name: &'static str,
    pub description: &'static str,
    search_url: &'static str,
    query_param: &'static str,
    /// Appended to the query, e.g. "tutorial"
    query_suffix: Option<&'static str>,
}

pub const PLATFORMS: &[Platform] = &[
    Platform {
        name: "Coursera",
        description: "University courses and specializations",
        search_url: "https://www.coursera.org/search",
        query_param: "query",
        query_suffix: None,
    },
    Platform {
        name: "Udemy",
        description: "Practical skills and hands-on courses",
        search_url: "https://www.udemy.com/courses/search/",
        query_param: "q",
        query_suffix: None,
    },
    Platform {
        name: "edX",
        description: "Courses from top universities",
        search_url: "https://www.edx.org/search",
        query_param: "q",
        query_suffix: None,
    },
    Platform {
        name: "Khan Academy",
        description: "Free educational content",
        search_url: "https://www.khanacademy.org/search",
        query_param: "page_search_query",
        query_suffix: None,
    },
    Platform {
        name: "YouTube",
        description: "Free video tutorials and explanations",
        search_url: "https://www.youtube.com/results",
        query_param: "search_query",
        query_suffix: Some("tutorial"),
    },
    Platform {
        name: "Pluralsight",
        description: "Technology and professional development",
        search_url: "https://www.pluralsight.com/search",
        query_param: "q",
        query_suffix: None,
    },
];

impl Platform {
    /// Search URL for `subtopic` on this platform
    pub fn search_link(&self, subtopic: &str) -> Option<Url> {
        let query = match self.query_suffix {
            Some(suffix) => format!("{} {}", subtopic, suffix),
            None => subtopic.to_string(),
        };
        Url::parse_with_params(self.search_url, &[(self.query_param, query)]).ok()
    }
}

/// Every platform with its search link for `subtopic`
pub fn course_links(subtopic: &str) -> Vec<(&'static Platform, Url)> {
    PLATFORMS.iter().filter_map(|p| p.search_link(subtopic).map(|url| (p, url))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_encode_subtopic() {
        let links = course_links("Pattern Matching & Enums");
        assert_eq!(links.len(), PLATFORMS.len());
        let (platform, url) = &links[0];
        assert_eq!(platform.name, "Coursera");
        assert_eq!(url.as_str(), "https://www.coursera.org/search?query=Pattern+Matching+%26+Enums");
    }

    #[test]
    fn youtube_searches_tutorials() {
        let youtube = PLATFORMS.iter().find(|p| p.name == "YouTube").unwrap();
        let url = youtube.search_link("Ownership").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/results?search_query=Ownership+tutorial");
    }
}
