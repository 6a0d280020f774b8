//! Types whose only constructor is private still get working views.

use immutable_view::prelude::*;

mod shelter {
    use immutable_view::{immutable_view, Obj};

    pub struct Cat {
        name: String,
        lives: u8,
        friend: Option<Obj<Cat>>,
    }

    impl Cat {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                lives: 9,
                friend: None,
            }
        }

        pub fn lives(&self) -> u8 {
            self.lives
        }

        pub fn lose_life(&mut self) {
            self.lives -= 1;
        }
    }

    pub fn adopt(name: &str) -> Obj<Cat> {
        Obj::new(Cat::new(name))
    }

    pub fn befriend(a: &Obj<Cat>, b: &Obj<Cat>) {
        a.write().friend = Some(b.clone());
    }

    immutable_view! {
        pub struct CatView for Cat {
            terminal name: String => get_name, set_name;
            terminal lives: u8 => get_lives, set_lives;
            complex friend: Cat => get_friend, set_friend;
        }
        mutators { lose_life }
    }
}

#[test]
fn strict_view_of_private_type() {
    let tom = shelter::adopt("Tom");
    let view = strict_view_of(&tom).unwrap();
    assert_eq!(view.get_name(), "Tom");
    assert_eq!(*view.get_lives(), 9);
    assert_eq!(
        view.lose_life(),
        Err(ViewError::ModificationRejected {
            type_name: "Cat",
            mutator: "lose_life",
        })
    );
    assert_eq!(tom.read().lives(), 9);
}

#[test]
fn silent_view_of_private_type() {
    let tom = shelter::adopt("Tom");
    let felix = shelter::adopt("Felix");
    shelter::befriend(&tom, &felix);

    let view = silent_view_of(&tom).unwrap();
    view.set_lives(1).unwrap();
    view.lose_life().unwrap();
    assert_eq!(*view.get_lives(), 9);

    let friend = view.get_friend().unwrap().unwrap();
    assert_eq!(friend.get_name(), "Felix");
    assert_eq!(friend.set_name("Garfield".into()), Ok(()));
    assert_eq!(friend.get_name(), "Felix");
}

#[test]
fn original_stays_mutable() {
    let tom = shelter::adopt("Tom");
    let view = strict_view_of(&tom).unwrap();
    tom.write().lose_life();
    assert_eq!(tom.read().lives(), 8);
    assert_eq!(*view.get_lives(), 9);
}
