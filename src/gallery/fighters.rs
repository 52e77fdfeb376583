use serde::Serialize;

/// A biographical record shown in the tribute gallery.
///
/// Records are compiled into the binary and never change at runtime; the `id` doubles as the
/// vote counter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Fighter {
    pub id: &'static str,
    pub name: &'static str,
    pub image_url: &'static str,
    pub description: &'static str,
    pub contribution: &'static str,
}

static FIGHTERS: [Fighter; 20] = [
    Fighter {
        id: "gandhi",
        name: "Mahatma Gandhi",
        image_url: "https://upload.wikimedia.org/wikipedia/commons/d/d1/Portrait_Gandhi.jpg",
        description: "Father of the Nation",
        contribution: "Led India to independence through non-violent civil disobedience",
    },
    Fighter {
        id: "bhagat-singh",
        name: "Bhagat Singh",
        image_url: "https://upload.wikimedia.org/wikipedia/commons/5/54/Bhagat_Singh_1929.jpg",
        description: "Revolutionary Freedom Fighter",
        contribution: "Sacrificed his life at 23 for independence, inspiring countless youth",
    },
    Fighter {
        id: "subhas-bose",
        name: "Subhas Chandra Bose",
        image_url: "https://upload.wikimedia.org/wikipedia/commons/4/44/Subhas_Chandra_Bose_NRB.jpg",
        description: "Netaji",
        contribution: "Founded the Indian National Army and fought for complete independence",
    },
    Fighter {
        id: "sardar-patel",
        name: "Sardar Vallabhbhai Patel",
        image_url: "https://upload.wikimedia.org/wikipedia/commons/f/f2/Sardar_patel_%28cropped%29.jpg",
        description: "Iron Man of India",
        contribution: "United 562 princely states into the Indian Union",
    },
    Fighter {
        id: "nehru",
        name: "Jawaharlal Nehru",
        image_url: "https://i.pinimg.com/736x/94/25/0f/94250f1c7e01df1911b028ec0656e3f0.jpg",
        description: "First Prime Minister",
        contribution: "Led the independence movement and shaped modern India",
    },
    Fighter {
        id: "rani-lakshmibai",
        name: "Rani Lakshmibai",
        image_url: "https://sawanonlinebookstore.com/wp-content/uploads/2022/05/jhansi-ki-rani-laxmibai.jpg",
        description: "Queen of Jhansi",
        contribution: "Fought valiantly against British rule in the 1857 revolt",
    },
    Fighter {
        id: "lal-bahadur",
        name: "Lal Bahadur Shastri",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRrPh8SORZtBZZDU3u7YE_uzl_Q5RTlCsQ_RQ&s",
        description: "Second Prime Minister",
        contribution: "Promoted the White Revolution and Green Revolution",
    },
    Fighter {
        id: "tilak",
        name: "Bal Gangadhar Tilak",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQ-MLq9-kqjyeHtQp58oe-aORG6kjt0Eqddtd6t1ZtlElWOU0-zLrJbV01I47IBxci6Urw&usqp=CAU",
        description: "Lokmanya",
        contribution: "First leader to demand complete independence (Swaraj is my birthright)",
    },
    Fighter {
        id: "annie-besant",
        name: "Annie Besant",
        image_url: "https://madrascourier.com/wp-content/uploads/2017/08/Annie-Besant-Madras-Courier-01.jpg",
        description: "Home Rule Movement Leader",
        contribution: "Advocated for Indian self-governance and women's rights",
    },
    Fighter {
        id: "lala-lajpat",
        name: "Lala Lajpat Rai",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSSvYfZRpdPuLo0VpXWCKVJZXIRd1Z4sFC5wg&s",
        description: "Punjab Kesari",
        contribution: "Led protests against British policies and partition of Bengal",
    },
    Fighter {
        id: "azad-maulana",
        name: "Maulana Abul Kalam Azad",
        image_url: "https://www.constitutionofindia.net/wp-content/uploads/2022/09/Maulana-Abul-Kalam-Azad.jpg",
        description: "First Education Minister",
        contribution: "Promoted education and communal harmony in independent India",
    },
    Fighter {
        id: "sarojini-naidu",
        name: "Sarojini Naidu",
        image_url: "https://blogger.googleusercontent.com/img/b/R29vZ2xl/AVvXsEgrmaIAAf6EUJBvKe2JKrBS7prtst7UXHkjCmcdWybPZ81sGI6zuxr1zQ2EQq7RV5D9Yo8An2M9w4kLsMmCkHwaBp3Y4JglzE9qF6CUTzoi0HDpzjSi4jPEBj0gG5KIgYBOWpyPWm8Rj_RL/s0/Portrait+of+Sarojini+Naidu+-+Bombay+1946.jpg",
        description: "Nightingale of India",
        contribution: "Poet, politician, and first woman governor of India",
    },
    Fighter {
        id: "chandrashekhar-azad",
        name: "Chandrashekhar Azad",
        image_url: "https://cdn.britannica.com/40/274440-050-4EC6EAAB/Portrait-Of-Indian-Freedom-Fighter-Chandra-Shekhar-Azad.jpg",
        description: "Revolutionary Leader",
        contribution: "Led the Hindustan Republican Association and never surrendered",
    },
    Fighter {
        id: "khan-ghaffar",
        name: "Khan Abdul Ghaffar Khan",
        image_url: "https://upload.wikimedia.org/wikipedia/commons/6/6a/Khan_Abdul_Ghaffar_Khan.jpg",
        description: "Frontier Gandhi",
        contribution: "Non-violent independence activist from the frontier province",
    },
    Fighter {
        id: "alluri-raju",
        name: "Alluri Sitarama Raju",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcShlmlLv7m9dFguC0uIA7o7oeMM_FCGRW7vW8tJIULH7uiUUDn6_j3OKBURkj8jyPpVuGM&usqp=CAU",
        description: "Revolutionary of Andhra Pradesh",
        contribution: "Led the Rampa Rebellion against British colonial rule",
    },
    Fighter {
        id: "kasturba-gandhi",
        name: "Kasturba Gandhi",
        image_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3d/Kasturba_Gandhi_1940.jpg/250px-Kasturba_Gandhi_1940.jpg",
        description: "Freedom Fighter",
        contribution: "Participated in independence movement alongside Mahatma Gandhi",
    },
    Fighter {
        id: "bharati",
        name: "Subramania Bharati",
        image_url: "https://madrascourier.com/wp-content/uploads/2019/03/Subramanya-Bharathi-Madras-Courier-07.jpg",
        description: "Tamil Poet and Freedom Fighter",
        contribution: "Used poetry to inspire freedom movement and social reform",
    },
    Fighter {
        id: "kumaran",
        name: "Tiruppur Kumaran",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcT4eu6Gl08Yo28Pjt5E2AyikWVnilThme9vxw&s",
        description: "Revolutionary of Tamil Nadu",
        contribution: "Died holding the Indian flag during protests against British rule",
    },
    Fighter {
        id: "bipin-pal",
        name: "Bipin Chandra Pal",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQNGGDpzmZKyC1sGGNdlM5yeoEam6drjKki0g&s",
        description: "Extremist Leader",
        contribution: "Part of Lal-Bal-Pal trio, advocated for complete independence",
    },
    Fighter {
        id: "ashfaqulla",
        name: "Ashfaqulla Khan",
        image_url: "https://vault.drishticuet.com/english_file_uploads/1729690572_image9jpeg.jpg",
        description: "Revolutionary Freedom Fighter",
        contribution: "Close associate of Ram Prasad Bismil, executed for the Kakori conspiracy",
    },
];

/// The full gallery, in display order.
pub fn fighters() -> &'static [Fighter] {
    &FIGHTERS
}

/// Look up a gallery record by its counter key.
pub fn fighter_by_id(id: &str) -> Option<&'static Fighter> {
    FIGHTERS.iter().find(|f| f.id == id)
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/fighters.rs"]
mod tests;
