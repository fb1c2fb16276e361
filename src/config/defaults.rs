pub fn server() -> String {
    String::from("https://agregator-production-5d03.up.railway.app/api/v1")
}

pub fn token_path() -> String {
    String::from("~/.local/share/sharepay/token.json")
}

pub fn disable() -> bool {
    false
}
