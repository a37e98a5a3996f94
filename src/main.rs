#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    kol_analytics_lib::run().await
}
