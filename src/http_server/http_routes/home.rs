use crate::http_server::pages::Page;

pub async fn index() -> Page<()> {
    Page::home()
}
