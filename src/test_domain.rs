//! Sample domain used by the unit tests.

use crate::Obj;

pub(crate) struct Person {
    pub(crate) name: String,
    pub(crate) age: u32,
    pub(crate) address: Option<Obj<Address>>,
}

impl Person {
    pub(crate) fn new(name: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            age,
            address: None,
        }
    }

    pub(crate) fn with_address(name: &str, age: u32, address: Address) -> Self {
        Self {
            address: Some(Obj::new(address)),
            ..Self::new(name, age)
        }
    }

    pub(crate) fn address_handle(&self) -> Option<Obj<Address>> {
        self.address.clone()
    }
}

crate::immutable_view! {
    pub(crate) struct PersonView for Person {
        terminal name: String => get_name, set_name;
        terminal age: u32 => get_age, set_age;
        complex address: Address => get_address, set_address;
    }
}

pub(crate) struct Address {
    pub(crate) street: Option<Obj<Street>>,
    pub(crate) city: String,
}

impl Address {
    pub(crate) fn new(street: Street, city: &str) -> Self {
        Self {
            street: Some(Obj::new(street)),
            city: city.to_string(),
        }
    }
}

crate::immutable_view! {
    pub(crate) struct AddressView for Address {
        complex street: Street => get_street, set_street;
        terminal city: String => get_city, set_city;
    }
}

pub(crate) struct Street {
    pub(crate) name: String,
    pub(crate) number: u32,
}

impl Street {
    pub(crate) fn new(name: &str, number: u32) -> Self {
        Self {
            name: name.to_string(),
            number,
        }
    }
}

crate::immutable_view! {
    pub(crate) struct StreetView for Street {
        terminal name: String => get_name, set_name;
        terminal number: u32 => get_number, set_number;
    }
}

pub(crate) struct Employee {
    pub(crate) name: String,
    pub(crate) manager: Option<Obj<Employee>>,
    pub(crate) mentor: Option<Obj<Employee>>,
}

impl Employee {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            manager: None,
            mentor: None,
        }
    }
}

crate::immutable_view! {
    pub(crate) struct EmployeeView for Employee {
        terminal name: String => get_name, set_name;
        complex manager: Employee => get_manager, set_manager;
        complex mentor: Employee => get_mentor, set_mentor;
    }
}

pub(crate) struct Counter {
    pub(crate) count: u64,
}

impl Counter {
    pub(crate) fn starting_at(count: u64) -> Self {
        Self { count }
    }
}

crate::immutable_view! {
    pub(crate) struct CounterView for Counter {
        terminal count: u64 => get_count;
    }
    mutators { increment -> u64 = count, reset }
}

pub(crate) mod shelter {
    use crate::Obj;

    /// Only reachable through [`adopt`].
    pub(crate) struct Cat {
        name: String,
        lives: u8,
    }

    impl Cat {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                lives: 9,
            }
        }
    }

    pub(crate) fn adopt(name: &str) -> Obj<Cat> {
        Obj::new(Cat::new(name))
    }

    crate::immutable_view! {
        pub(crate) struct CatView for Cat {
            terminal name: String => get_name, set_name;
            terminal lives: u8 => get_lives, set_lives;
        }
    }
}
