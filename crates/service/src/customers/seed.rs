use crate::customers::domain::Customer;

fn customer(id: &str, name: &str, role: &str, email: &str, phone: u64, contacted: bool) -> Customer {
    Customer {
        id: id.into(),
        name: name.into(),
        role: role.into(),
        email: email.into(),
        phone,
        contacted,
    }
}

/// Customers loaded into a fresh store at startup.
pub fn demo_customers() -> Vec<Customer> {
    vec![
        customer("023004163", "Alan Grant", "Paleontologist", "alan.grant@example.com", 5550100101, true),
        customer("490503918", "Ellie Sattler", "Paleobotanist", "ellie.sattler@example.com", 5550100102, true),
        customer("344061207", "Ian Malcolm", "Mathematician", "ian.malcolm@example.com", 5550100103, false),
        customer("869912750", "Donald Gennaro", "Lawyer", "donald.gennaro@example.com", 5550100104, false),
        customer("400025134", "Lex Murphy", "Systems Administrator", "lex.murphy@example.com", 5550100105, true),
        customer("730857602", "Tim Murphy", "Dinosaur Enthusiast", "tim.murphy@example.com", 5550100106, false),
    ]
}
