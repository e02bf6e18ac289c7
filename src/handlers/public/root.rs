/// GET / - welcome text
pub async fn root() -> &'static str {
    "myFlix. All the greats, in one place!"
}
