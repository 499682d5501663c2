use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMetadata,
}

impl<A, B> From<metadata::metadata::ListResponse<B>> for ListResponse<A>
where B: Into<A>
{
    fn from(resp: metadata::metadata::ListResponse<B>) -> Self {
        let data = resp.data.into_iter().map(|v| v.into()).collect();
        let meta = ResponseMetadata {
            next: resp.meta.next,
        };
        ListResponse { data, meta }
    }
}
