table! {
    users (id) {
        id -> Integer,
        username -> Text,
        #[sql_name = "hash"]
        password_hash -> Text,
    }
}
