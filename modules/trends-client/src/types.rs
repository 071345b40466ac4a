use serde::{Deserialize, Serialize};

// --- Explore ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExploreRequest<'a> {
    pub comparison_item: Vec<ComparisonItem<'a>>,
    pub category: u32,
    pub property: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ComparisonItem<'a> {
    pub keyword: &'a str,
    pub time: &'a str,
    pub geo: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExploreResponse {
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Widget {
    pub id: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub request: serde_json::Value,
}

impl ExploreResponse {
    /// The widget that carries related-queries data, if the topic has any.
    pub fn related_queries_widget(&self) -> Option<&Widget> {
        self.widgets
            .iter()
            .find(|w| w.id.starts_with("RELATED_QUERIES") && !w.token.is_empty())
    }
}

// --- Related searches ---

#[derive(Debug, Deserialize)]
pub(crate) struct RelatedSearchesResponse {
    pub default: RankedData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RankedData {
    #[serde(default)]
    pub ranked_list: Vec<RankedList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RankedList {
    #[serde(default)]
    pub ranked_keyword: Vec<RankedKeyword>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RankedKeyword {
    pub query: String,
    #[serde(default)]
    pub value: u32,
}

impl RelatedSearchesResponse {
    /// Ranked list 0 is "top", list 1 is "rising". Either may be absent.
    pub fn into_related(self) -> RelatedQueries {
        let mut lists = self.default.ranked_list.into_iter();
        let mut take = || -> Vec<RelatedQuery> {
            lists
                .next()
                .map(|l| {
                    l.ranked_keyword
                        .into_iter()
                        .map(|k| RelatedQuery {
                            query: k.query,
                            value: k.value,
                        })
                        .collect()
                })
                .unwrap_or_default()
        };
        let top = take();
        let rising = take();
        RelatedQueries { top, rising }
    }
}

// --- Public result types ---

/// One related search term with its relative interest (0-100 for top,
/// growth percentage for rising).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub query: String,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedQueries {
    pub top: Vec<RelatedQuery>,
    pub rising: Vec<RelatedQuery>,
}

impl RelatedQueries {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.rising.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explore_request_wire_shape() {
        let req = ExploreRequest {
            comparison_item: vec![ComparisonItem {
                keyword: "electric cars",
                time: "today 1-m",
                geo: "IN",
            }],
            category: 0,
            property: "",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["comparisonItem"][0]["keyword"], "electric cars");
        assert_eq!(json["comparisonItem"][0]["time"], "today 1-m");
        assert_eq!(json["category"], 0);
        assert_eq!(json["property"], "");
    }

    #[test]
    fn finds_related_queries_widget() {
        let resp: ExploreResponse = serde_json::from_value(serde_json::json!({
            "widgets": [
                {"id": "TIMESERIES", "token": "t1", "request": {}},
                {"id": "RELATED_TOPICS", "token": "t2", "request": {}},
                {"id": "RELATED_QUERIES", "token": "t3", "request": {"restriction": {}}}
            ]
        }))
        .unwrap();
        let widget = resp.related_queries_widget().unwrap();
        assert_eq!(widget.token, "t3");
    }

    #[test]
    fn no_related_widget_when_topic_too_small() {
        let resp: ExploreResponse = serde_json::from_value(serde_json::json!({
            "widgets": [{"id": "TIMESERIES", "token": "t1", "request": {}}]
        }))
        .unwrap();
        assert!(resp.related_queries_widget().is_none());
    }

    #[test]
    fn splits_top_and_rising() {
        let resp: RelatedSearchesResponse = serde_json::from_value(serde_json::json!({
            "default": {"rankedList": [
                {"rankedKeyword": [
                    {"query": "electric car price", "value": 100, "formattedValue": "100"},
                    {"query": "best electric car 2024", "value": 80, "formattedValue": "80"}
                ]},
                {"rankedKeyword": [
                    {"query": "ev subsidy", "value": 5000, "formattedValue": "Breakout"}
                ]}
            ]}
        }))
        .unwrap();
        let related = resp.into_related();
        assert_eq!(related.top.len(), 2);
        assert_eq!(related.top[0].query, "electric car price");
        assert_eq!(related.top[1].value, 80);
        assert_eq!(related.rising[0].query, "ev subsidy");
    }

    #[test]
    fn empty_ranked_list_is_empty() {
        let resp: RelatedSearchesResponse =
            serde_json::from_value(serde_json::json!({"default": {"rankedList": []}})).unwrap();
        assert!(resp.into_related().is_empty());
    }
}
