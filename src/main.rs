#[rocket::launch]
fn rocket() -> _ {
    university_api::rocket()
}
