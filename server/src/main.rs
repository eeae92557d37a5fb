use server_library::server::server::Server;

#[actix_web::main]
async fn main() {
    Server::run().await;
    Server::terminate().await;
}
