use crate::commands::CmdResult;
use crate::directory::UserStore;
use crate::error::Result;
use crate::query::UserQuery;
use crate::store::BlobStore;

pub fn run<B: BlobStore>(store: &UserStore<B>, query: &UserQuery) -> Result<CmdResult> {
    let listed = query.apply(store.users());
    Ok(CmdResult::default().with_listed_users(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewUser;
    use crate::persistence::UserPersistence;
    use crate::query::{SortKey, SortOrder};
    use crate::store::memory::MemBlobStore;

    #[test]
    fn lists_in_insertion_order_by_default() {
        let mut store = UserStore::initialize(UserPersistence::new(MemBlobStore::new()));
        store.add_user(NewUser::new("Zed", "zed@x.com"));
        store.add_user(NewUser::new("Amy", "amy@x.com"));

        let result = run(&store, &UserQuery::default()).unwrap();
        let names: Vec<_> = result.listed_users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
    }

    #[test]
    fn applies_search_and_sort() {
        let mut store = UserStore::initialize(UserPersistence::new(MemBlobStore::new()));
        store.add_user(NewUser::new("Zed", "zed@corp.com"));
        store.add_user(NewUser::new("Amy", "amy@corp.com"));
        store.add_user(NewUser::new("Max", "max@home.net"));

        let query = UserQuery::default()
            .search("corp")
            .sort_by(SortKey::Name, SortOrder::Ascending);
        let result = run(&store, &query).unwrap();
        let names: Vec<_> = result.listed_users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }
}
